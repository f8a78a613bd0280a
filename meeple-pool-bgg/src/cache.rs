use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// A cached value together with when it was fetched.
#[derive(Debug, Clone)]
pub struct Cached<V> {
    pub value: V,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    fetched_at: DateTime<Local>,
    stored: Instant,
    touched: Instant,
}

/// In-memory cache with a freshness window and a retention window.
///
/// Entries younger than `fresh_for` are served. Entries nobody has read or
/// written for `keep_for` are dropped on the next access.
#[derive(Debug)]
pub struct CollectionCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    fresh_for: Duration,
    keep_for: Duration,
}

impl<K: Eq + Hash, V: Clone> CollectionCache<K, V> {
    pub fn new(fresh_for: Duration, keep_for: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fresh_for,
            keep_for,
        }
    }

    /// The cached value for `key`, if one exists and is still fresh.
    pub async fn get_fresh(&self, key: &K) -> Option<Cached<V>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        self.evict_expired(&mut entries, now);

        let entry = entries.get_mut(key)?;
        entry.touched = now;
        if now.duration_since(entry.stored) >= self.fresh_for {
            return None;
        }
        Some(Cached {
            value: entry.value.clone(),
            fetched_at: entry.fetched_at,
        })
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        self.evict_expired(&mut entries, now);
        entries.insert(
            key,
            Entry {
                value,
                fetched_at: Local::now(),
                stored: now,
                touched: now,
            },
        );
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.lock().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        let mut entries = self.entries.lock().await;
        self.evict_expired(&mut entries, Instant::now());
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn evict_expired(&self, entries: &mut HashMap<K, Entry<V>>, now: Instant) {
        let before = entries.len();
        entries.retain(|_, e| now.duration_since(e.touched) < self.keep_for);
        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("Evicted {} idle cache entries", evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> CollectionCache<String, u32> {
        CollectionCache::new(Duration::from_secs(300), Duration::from_secs(600))
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entries_are_served() {
        let cache = cache();
        cache.insert("alice".into(), 7).await;
        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(cache.get_fresh(&"alice".into()).await.map(|c| c.value), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_not_served_but_kept() {
        let cache = cache();
        cache.insert("alice".into(), 7).await;
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(cache.get_fresh(&"alice".into()).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_entries_are_evicted() {
        let cache = cache();
        cache.insert("alice".into(), 7).await;
        cache.insert("bob".into(), 9).await;
        tokio::time::sleep(Duration::from_secs(400)).await;
        // Reading bob keeps it around even though it is stale.
        assert!(cache.get_fresh(&"bob".into()).await.is_none());
        tokio::time::sleep(Duration::from_secs(250)).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get_fresh(&"alice".into()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_and_clear() {
        let cache = cache();
        cache.insert("alice".into(), 1).await;
        cache.insert("bob".into(), 2).await;
        cache.invalidate(&"alice".into()).await;
        assert!(cache.get_fresh(&"alice".into()).await.is_none());
        assert_eq!(cache.len().await, 1);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
