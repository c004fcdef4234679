use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, configuration, and snapshot layers.
#[derive(Error, Debug)]
pub enum ClosingError {
    #[error("Snapshot not loaded")]
    SnapshotNotLoaded,
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = StdResult<T, ClosingError>;

impl From<std::io::Error> for ClosingError {
    fn from(err: std::io::Error) -> Self {
        ClosingError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ClosingError {
    fn from(err: serde_json::Error) -> Self {
        ClosingError::StorageError(err.to_string())
    }
}

impl From<chrono::ParseError> for ClosingError {
    fn from(err: chrono::ParseError) -> Self {
        ClosingError::InvalidInput(err.to_string())
    }
}
