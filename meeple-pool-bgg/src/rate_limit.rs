use std::future::Future;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Minimum spacing the catalog service asks clients to keep between requests.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1000);

/// Serializes calls to the catalog service.
///
/// Operations run one at a time in the order `throttle` was called, and the
/// start of each operation is at least `min_interval` after the start of the
/// previous one. The queue is the mutex's waiter list, which tokio serves
/// first-in first-out, and whoever holds the lock is the single active drain.
#[derive(Debug)]
pub struct RateLimiter {
    last_dispatch: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_REQUEST_INTERVAL)
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_dispatch: Mutex::new(None),
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run `operation` once every earlier caller has finished and the minimum
    /// interval has passed, and hand back its output.
    ///
    /// A failing operation only affects its own caller; the next queued
    /// operation starts as usual.
    pub async fn throttle<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if now < ready_at {
                log::debug!("Rate limiting: waiting {:?}", ready_at - now);
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());

        operation().await
    }
}
