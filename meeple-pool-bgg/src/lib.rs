//! Client for the BoardGameGeek XML API: rate-limited fetching with retry,
//! normalization of collection and thing records, and cached aggregation of
//! several users' collections.

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod rate_limit;
pub mod retry;
pub mod settings;
pub mod shelf;
pub mod transport;
pub mod types;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{fetch_aggregated_collections, fetch_user_collection, normalize_usernames};
pub use cache::{Cached, CollectionCache};
pub use client::{BggClient, DEFAULT_BASE_URL, THING_BATCH_SIZE};
pub use error::BggError;
pub use normalize::{normalize_collection_item, normalize_thing_item, select_rank};
pub use rate_limit::{MIN_REQUEST_INTERVAL, RateLimiter};
pub use retry::{AttemptFailure, MAX_RETRIES, RetryPolicy};
pub use settings::{
    BggConfig, ClientSettings, SettingSource, SettingsSources, config_path, parse_config,
    save_to_file,
};
pub use shelf::GameShelf;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
pub use types::{RawCollectionRecord, RawDetailRecord, RawRank};
