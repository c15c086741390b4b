use model::error::ModelError;
use thiserror::Error;

/// Errors raised while resolving loader configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid run date: {0}")]
    InvalidRunDate(#[from] ModelError),

    #[error("Batch size must be a positive integer, got '{0}'")]
    InvalidBatchSize(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid env file: {0}")]
    EnvFormat(String),
}
