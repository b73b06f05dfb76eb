//! Error types for tourbook.

use thiserror::Error;

/// Errors that can occur in tourbook operations.
#[derive(Error, Debug)]
pub enum TourbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event record: {0}")]
    InvalidRecord(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TourbookError {
    fn from(err: serde_json::Error) -> Self {
        TourbookError::Serialization(err.to_string())
    }
}

/// Result type alias for tourbook operations.
pub type TourbookResult<T> = Result<T, TourbookError>;
