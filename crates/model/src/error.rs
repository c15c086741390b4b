use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid run date: {0}")]
    InvalidRunDate(String),

    #[error("expected a JSON object for a record, found {0}")]
    NotAnObject(String),
}
