use chrono::{DateTime, Local};
use meeple_pool_core::{GameData, NormalizedPartial};

use crate::aggregate::{fetch_aggregated_collections, fetch_user_collection, normalize_usernames};
use crate::cache::CollectionCache;
use crate::client::BggClient;
use crate::error::BggError;
use crate::settings::ClientSettings;
use crate::transport::{ReqwestTransport, Transport};

/// Cached access to merged collections.
///
/// Aggregated results are keyed by the normalized username list, so
/// `["alice", " bob"]` and `["alice", "bob", "alice"]` share an entry.
pub struct GameShelf<T = ReqwestTransport> {
    client: BggClient<T>,
    aggregated: CollectionCache<Vec<String>, Vec<GameData>>,
    users: CollectionCache<String, Vec<NormalizedPartial>>,
}

impl GameShelf<ReqwestTransport> {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, BggError> {
        Ok(Self::new(BggClient::from_settings(settings)?, settings))
    }
}

impl<T: Transport> GameShelf<T> {
    pub fn new(client: BggClient<T>, settings: &ClientSettings) -> Self {
        Self {
            client,
            aggregated: CollectionCache::new(settings.fresh_for(), settings.keep_for()),
            users: CollectionCache::new(settings.fresh_for(), settings.keep_for()),
        }
    }

    /// Merged games for `usernames`, served from cache while fresh.
    pub async fn collections<S: AsRef<str>>(
        &self,
        usernames: &[S],
    ) -> Result<Vec<GameData>, BggError> {
        let key = normalize_usernames(usernames);
        if key.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(cached) = self.aggregated.get_fresh(&key).await {
            log::debug!(
                "Serving {} games for [{}] from cache (fetched {})",
                cached.value.len(),
                key.join(", "),
                cached.fetched_at.format("%H:%M:%S")
            );
            return Ok(cached.value);
        }
        self.refresh(&key).await
    }

    /// Refetch merged games for `usernames`, ignoring any cached entry.
    /// Requests still go through the client's rate limiter.
    pub async fn refresh<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Vec<GameData>, BggError> {
        let key = normalize_usernames(usernames);
        if key.is_empty() {
            return Ok(Vec::new());
        }
        let games = fetch_aggregated_collections(&self.client, &key).await?;
        self.aggregated.insert(key, games.clone()).await;
        Ok(games)
    }

    /// One user's normalized collection, without detail backfill.
    pub async fn user_collection(&self, username: &str) -> Result<Vec<NormalizedPartial>, BggError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(Vec::new());
        }
        let key = username.to_string();
        if let Some(cached) = self.users.get_fresh(&key).await {
            return Ok(cached.value);
        }
        let items = fetch_user_collection(&self.client, username).await?;
        self.users.insert(key, items.clone()).await;
        Ok(items)
    }

    /// When the cached result for `usernames` was fetched, if it is fresh.
    pub async fn fetched_at<S: AsRef<str>>(&self, usernames: &[S]) -> Option<DateTime<Local>> {
        let key = normalize_usernames(usernames);
        self.aggregated
            .get_fresh(&key)
            .await
            .map(|cached| cached.fetched_at)
    }

    /// Drop cached results for `usernames`.
    pub async fn invalidate<S: AsRef<str>>(&self, usernames: &[S]) {
        self.aggregated.invalidate(&normalize_usernames(usernames)).await;
    }

    pub async fn clear(&self) {
        self.aggregated.clear().await;
        self.users.clear().await;
    }
}
