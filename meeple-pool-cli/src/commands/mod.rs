pub(crate) mod config;
pub(crate) mod games;
pub(crate) mod user;

use crate::CliError;

/// Build the multi-threaded runtime that drives one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))
}
