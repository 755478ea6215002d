//! In-memory metadata provider built from the `[[models]]` configuration.

use crate::adapter::MetadataProvider;
use crate::config::ModelConfig;
use crate::error::{SchemaError, SchemaResult};
use modlr_model::{ModelMetadata, DEFAULT_PERSISTER};
use tracing::debug;

/// Registered model metadata, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    models: Vec<ModelMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from configuration, rejecting empty or duplicate types.
    pub fn from_models(models: &[ModelConfig]) -> SchemaResult<Self> {
        let mut registry = Self::new();
        for model in models {
            let metadata = ModelMetadata {
                model_type: model.model_type.clone(),
                collection: model
                    .collection
                    .clone()
                    .unwrap_or_else(|| model.model_type.clone()),
                persister: model
                    .persister
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PERSISTER.to_string()),
                fields: model.fields.clone(),
            };
            registry.register(metadata)?;
        }
        Ok(registry)
    }

    /// Adds metadata for a new model type.
    pub fn register(&mut self, metadata: ModelMetadata) -> SchemaResult<()> {
        if metadata.model_type.trim().is_empty() {
            return Err(SchemaError::Config("model type is empty".into()));
        }
        if metadata.collection.trim().is_empty() {
            return Err(SchemaError::Config(format!(
                "model '{}' has an empty collection",
                metadata.model_type
            )));
        }
        if self.models.iter().any(|m| m.model_type == metadata.model_type) {
            return Err(SchemaError::Config(format!(
                "model type '{}' registered twice",
                metadata.model_type
            )));
        }
        debug!(
            model_type = %metadata.model_type,
            collection = %metadata.collection,
            persister = %metadata.persister,
            "Registered model metadata"
        );
        self.models.push(metadata);
        Ok(())
    }

    /// Registered models in registration order.
    pub fn models(&self) -> &[ModelMetadata] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl MetadataProvider for MetadataRegistry {
    fn metadata_for_type(&self, model_type: &str) -> SchemaResult<ModelMetadata> {
        self.models
            .iter()
            .find(|m| m.model_type == model_type)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(model_type.to_string()))
    }

    fn all_known_types(&self) -> Vec<String> {
        self.models.iter().map(|m| m.model_type.clone()).collect()
    }
}
