//! Error types for the storage layer.

use modlr_model::InvalidFlag;
use modlr_schema::AdapterError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An index option this persister cannot honor.
    #[error("option '{option}' is not supported by the {persister} persister")]
    UnsupportedOption { option: String, persister: String },

    /// A persister type with no built-in implementation.
    #[error("the persister type \"{0}\" is currently not supported")]
    UnsupportedPersister(String),

    /// No persister registered under this name.
    #[error("persister not found: {0}")]
    PersisterNotFound(String),

    /// A connection mutex was poisoned by a panicking holder.
    #[error("connection lock poisoned")]
    LockPoisoned,

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<StorageError> for AdapterError {
    fn from(err: StorageError) -> Self {
        AdapterError::new(err.to_string())
    }
}

impl From<InvalidFlag> for StorageError {
    fn from(err: InvalidFlag) -> Self {
        StorageError::InvalidData(err.to_string())
    }
}
