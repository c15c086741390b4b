use connectors::error::FetchError;
use engine_config::error::ConfigError;
use engine_core::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Run failed: {0}")]
    Run(#[from] RunError),

    #[error("Failed to build query: {0}")]
    Query(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid invocation event: {0}")]
    InvalidEvent(String),
}
