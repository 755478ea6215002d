//! Shared test doubles for reconciler tests.

#![allow(dead_code)]

use modlr_model::{IndexKey, IndexOptions, ModelMetadata};
use modlr_schema::{
    AdapterError, BackingStore, MetadataRegistry, Provisioned, SchemaConfig,
};
use std::collections::HashSet;
use std::sync::Mutex;

/// One call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateIndex {
        collection: String,
        keys: Vec<IndexKey>,
        options: IndexOptions,
    },
    CreateSchemata {
        model_type: String,
    },
}

/// Backing store double that records every call and remembers what it created.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    created: Mutex<HashSet<String>>,
    failing_types: HashSet<String>,
    no_background: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call for `model_type` fails with an adapter error.
    pub fn failing_for(mut self, model_type: &str) -> Self {
        self.failing_types.insert(model_type.to_string());
        self
    }

    pub fn without_background_support(mut self) -> Self {
        self.no_background = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn index_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateIndex { .. }))
            .count()
    }

    fn provision(&self, key: String, metadata: &ModelMetadata) -> Result<Provisioned, AdapterError> {
        if self.failing_types.contains(&metadata.model_type) {
            return Err(AdapterError::new(format!(
                "connection refused for {}",
                metadata.collection
            )));
        }
        if self.created.lock().unwrap().insert(key) {
            Ok(Provisioned::Created)
        } else {
            Ok(Provisioned::AlreadyExists)
        }
    }
}

impl BackingStore for RecordingStore {
    fn create_index(
        &self,
        metadata: &ModelMetadata,
        keys: &[IndexKey],
        options: &IndexOptions,
    ) -> Result<Provisioned, AdapterError> {
        self.calls.lock().unwrap().push(Call::CreateIndex {
            collection: metadata.collection.clone(),
            keys: keys.to_vec(),
            options: options.clone(),
        });
        let name = options.name().unwrap_or_default();
        self.provision(format!("index:{}:{}", metadata.collection, name), metadata)
    }

    fn create_schemata(&self, metadata: &ModelMetadata) -> Result<Provisioned, AdapterError> {
        self.calls.lock().unwrap().push(Call::CreateSchemata {
            model_type: metadata.model_type.clone(),
        });
        self.provision(format!("schema:{}", metadata.collection), metadata)
    }

    fn supports_background_build(&self, _metadata: &ModelMetadata) -> bool {
        !self.no_background
    }
}

/// Registry with the given model types, each stored in a collection named after it.
pub fn registry(types: &[&str]) -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    for t in types {
        registry.register(ModelMetadata::new(t)).unwrap();
    }
    registry
}

pub fn schema_config(value: serde_json::Value) -> SchemaConfig {
    serde_json::from_value(value).unwrap()
}
