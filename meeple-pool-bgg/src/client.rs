use std::sync::Arc;

use crate::error::BggError;
use crate::rate_limit::RateLimiter;
use crate::retry::{AttemptFailure, RetryPolicy};
use crate::settings::ClientSettings;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{self, RawCollectionRecord, RawDetailRecord};
use crate::xml::{self, XmlNode};

/// Default endpoint root of the catalog service's XML API.
pub const DEFAULT_BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// Most ids the thing endpoint accepts in one request.
pub const THING_BATCH_SIZE: usize = 20;

/// Client for the catalog service's XML API.
///
/// Every physical request, including each retry, goes through the shared
/// [`RateLimiter`]. Backoff sleeps happen outside the limiter so other
/// queued requests can proceed meanwhile.
pub struct BggClient<T = ReqwestTransport> {
    transport: T,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    base_url: String,
}

impl BggClient<ReqwestTransport> {
    /// Build a reqwest-backed client from resolved settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, BggError> {
        let transport = ReqwestTransport::new(settings.timeout())?;
        Ok(Self::with_transport(transport, settings))
    }
}

impl<T: Transport> BggClient<T> {
    pub fn with_transport(transport: T, settings: &ClientSettings) -> Self {
        Self {
            transport,
            limiter: Arc::new(RateLimiter::new(settings.min_request_interval())),
            retry: RetryPolicy::default(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Share an existing limiter, so several clients keep one request pace.
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// The limiter every request of this client waits on.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Fetch the board games `username` marks as owned.
    ///
    /// An unknown user or empty collection yields an empty list.
    pub async fn fetch_collection(
        &self,
        username: &str,
    ) -> Result<Vec<RawCollectionRecord>, BggError> {
        let query = vec![
            ("username", username.to_string()),
            ("stats", "1".to_string()),
            ("subtype", "boardgame".to_string()),
            ("own", "1".to_string()),
        ];

        let root = match self.get_xml("collection", &query).await {
            Ok(root) => root,
            Err(e) if e.is_not_found() => {
                log::warn!("User \"{}\" not found or has no collection", username);
                return Ok(Vec::new());
            }
            Err(e) => {
                log::error!("Error fetching collection for {}: {}", username, e);
                return Err(e.for_collection(username));
            }
        };

        if let Some(message) = types::error_message(&root) {
            log::warn!(
                "User \"{}\" not found or has no collection: {}",
                username,
                message
            );
            return Ok(Vec::new());
        }

        let records: Vec<RawCollectionRecord> = types::items(&root)
            .map(RawCollectionRecord::from_node)
            .collect();
        log::debug!("Collection for {}: {} items", username, records.len());
        Ok(records)
    }

    /// Fetch full details for `ids`, [`THING_BATCH_SIZE`] ids per request.
    ///
    /// Chunks are requested one after another. No ids means no request.
    pub async fn fetch_details(&self, ids: &[String]) -> Result<Vec<RawDetailRecord>, BggError> {
        let mut results = Vec::new();

        for chunk in ids.chunks(THING_BATCH_SIZE) {
            let query = vec![
                ("id", chunk.join(",")),
                ("stats", "1".to_string()),
                ("type", "boardgame".to_string()),
            ];
            let root = self.get_xml("thing", &query).await.map_err(|e| {
                log::error!("Error fetching thing details: {}", e);
                e.for_details(chunk)
            })?;

            if let Some(message) = types::error_message(&root) {
                return Err(BggError::malformed(message).for_details(chunk));
            }
            results.extend(types::items(&root).map(RawDetailRecord::from_node));
        }

        log::debug!("Fetched details for {} of {} ids", results.len(), ids.len());
        Ok(results)
    }

    /// GET `endpoint` with retries and parse the body as XML.
    async fn get_xml(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<XmlNode, BggError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            let outcome = self
                .limiter
                .throttle(|| self.transport.get(&url, query))
                .await;

            let failure = match outcome {
                Ok(resp) if resp.status == 202 => AttemptFailure::Queued {
                    retry_after: resp.retry_after,
                },
                Ok(resp) if (200..300).contains(&resp.status) => {
                    return xml::parse_document(&resp.body);
                }
                Ok(resp) => AttemptFailure::Status {
                    status: resp.status,
                    retry_after: resp.retry_after,
                },
                Err(e) => AttemptFailure::Network(e),
            };

            if !self.retry.is_retryable(&failure) {
                return Err(match failure {
                    AttemptFailure::Status { status, .. } => BggError::Status {
                        endpoint: url,
                        status,
                    },
                    other => BggError::Network {
                        endpoint: url,
                        message: other.to_string(),
                    },
                });
            }

            if retries >= self.retry.max_retries {
                return Err(BggError::RetriesExhausted {
                    endpoint: url,
                    attempts: retries + 1,
                    reason: failure.to_string(),
                });
            }

            retries += 1;
            let delay = self.retry.delay(&failure, retries);
            match failure {
                AttemptFailure::Queued { .. } => log::info!(
                    "Retry attempt {} for {}. Request was queued (202), waiting for processing...",
                    retries,
                    url
                ),
                ref other => log::info!("Retry attempt {} for {}. Reason: {}", retries, url, other),
            }
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
