//! Declarative configuration sections consumed by the schema tooling.
//!
//! These are raw, deserialized shapes. Required fields are `Option`s so that
//! a missing value surfaces as a [`SchemaError::Config`](crate::SchemaError)
//! naming the offending entry instead of an anonymous parse failure.

use modlr_model::FieldMapping;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `[schema]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    #[serde(default)]
    pub indices: Vec<IndexEntry>,
}

/// One `[[schema.indices]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    /// Ordered `[field, direction]` pairs.
    #[serde(default)]
    pub keys: Option<Vec<(String, i64)>>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// One `[[models]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(rename = "type")]
    pub model_type: String,
    /// Defaults to the model type.
    #[serde(default)]
    pub collection: Option<String>,
    /// Defaults to [`DEFAULT_PERSISTER`](modlr_model::DEFAULT_PERSISTER).
    #[serde(default)]
    pub persister: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}
