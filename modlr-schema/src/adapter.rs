use crate::error::{AdapterError, SchemaResult};
use modlr_model::{IndexKey, IndexOptions, ModelMetadata};

/// Resolves persistence metadata for model types.
pub trait MetadataProvider: Send + Sync {
    /// Returns the metadata for `model_type`, or
    /// [`SchemaError::UnknownType`](crate::SchemaError::UnknownType) if it is not registered.
    fn metadata_for_type(&self, model_type: &str) -> SchemaResult<ModelMetadata>;

    /// Every registered model type, in registration order.
    fn all_known_types(&self) -> Vec<String>;
}

/// What a creation primitive did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyExists,
}

/// Index and schema creation primitives of a concrete storage engine.
///
/// Both primitives must be idempotent: asking for a structure that already
/// exists reports [`Provisioned::AlreadyExists`] rather than an error.
pub trait BackingStore: Send + Sync {
    fn create_index(
        &self,
        metadata: &ModelMetadata,
        keys: &[IndexKey],
        options: &IndexOptions,
    ) -> Result<Provisioned, AdapterError>;

    fn create_schemata(&self, metadata: &ModelMetadata) -> Result<Provisioned, AdapterError>;

    /// Whether index builds for this model can run without blocking readers.
    fn supports_background_build(&self, metadata: &ModelMetadata) -> bool {
        let _ = metadata;
        true
    }
}
