use connectors::error::{EncodeError, FetchError, StorageError};
use engine_config::error::ConfigError;
use thiserror::Error;

/// Anything that ends a run early. The inner error is carried as-is.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Storage write failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The source returned more records than the window asked for.
    #[error("Page at offset {offset} has {rows} records, more than the limit of {limit}")]
    OversizedPage {
        offset: usize,
        rows: usize,
        limit: usize,
    },

    #[error("Run has already been executed (state: {0})")]
    AlreadyExecuted(String),
}
