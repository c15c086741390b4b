use thiserror::Error;

/// Failures of a single page request against the remote API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with anything other than 200.
    #[error("Remote query failed with status {status}: {url}")]
    RemoteQuery { status: u16, url: String },

    /// The body was not a JSON array of objects.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Timeout, refused connection, DNS failure or a broken body stream.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RemoteQuery { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush encoded page: {0}")]
    Flush(String),

    #[error("Cannot encode an empty page")]
    EmptyPage,
}

#[derive(Debug, Error)]
pub enum StorageError {
    /// The sink rejected the object.
    #[error("Failed to write object '{key}' to bucket '{bucket}': {source}")]
    Write {
        bucket: String,
        key: String,
        #[source]
        source: opendal::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(#[from] opendal::Error),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Lock error: {0}")]
    LockError(String),
}
