use tokio::time::Duration;

use crate::transport::TransportError;

/// Retries allowed after the first attempt of a physical request.
pub const MAX_RETRIES: u32 = 5;

const QUEUED_STEP_MS: u64 = 2_000;
const QUEUED_CAP_MS: u64 = 10_000;
const BACKOFF_BASE_MS: u64 = 1_000;
const BACKOFF_CAP_MS: u64 = 16_000;

/// Why a single attempt did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// HTTP 202: the service accepted the request and is still preparing it.
    Queued { retry_after: Option<Duration> },
    /// Any other unsuccessful status.
    Status {
        status: u16,
        retry_after: Option<Duration>,
    },
    /// No response at all.
    Network(TransportError),
}

impl AttemptFailure {
    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Queued { retry_after } | Self::Status { retry_after, .. } => *retry_after,
            Self::Network(_) => None,
        }
    }
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued { .. } => write!(f, "request queued (202)"),
            Self::Status { status, .. } => write!(f, "HTTP {status}"),
            Self::Network(e) => write!(f, "{e}"),
        }
    }
}

/// Decides whether and when to retry a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Whether `failure` is worth another attempt at all.
    pub fn is_retryable(&self, failure: &AttemptFailure) -> bool {
        match failure {
            AttemptFailure::Queued { .. } | AttemptFailure::Network(_) => true,
            AttemptFailure::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// A `Retry-After` directive wins. Otherwise queued responses back off
    /// linearly (2s, 4s, ... capped at 10s) and everything else exponentially
    /// (1s, 2s, 4s, ... capped at 16s).
    pub fn delay(&self, failure: &AttemptFailure, retry: u32) -> Duration {
        if let Some(retry_after) = failure.retry_after() {
            return retry_after;
        }
        let retry = u64::from(retry.max(1));
        let ms = match failure {
            AttemptFailure::Queued { .. } => (QUEUED_STEP_MS * retry).min(QUEUED_CAP_MS),
            _ => {
                let factor = 1u64.checked_shl((retry - 1) as u32).unwrap_or(u64::MAX);
                BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS)
            }
        };
        Duration::from_millis(ms)
    }
}
