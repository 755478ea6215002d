//! Error types for schema reconciliation.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while loading configuration or resolving metadata.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Malformed or incomplete declarative configuration. Always fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// The model type has no registered metadata.
    #[error("unknown model type: {0}")]
    UnknownType(String),
}

/// Opaque failure reported by a backing store.
///
/// The reconciler only ever renders it into a `Failed` outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AdapterError {
    message: String,
}

impl AdapterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
