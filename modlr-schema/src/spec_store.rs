//! Holds the declarative set of desired indices.

use crate::config::{IndexEntry, SchemaConfig};
use crate::error::{SchemaError, SchemaResult};
use modlr_model::{derive_index_name, IndexDirection, IndexKey, IndexOptions, IndexSpec};
use std::collections::HashSet;
use tracing::debug;

/// Immutable, validated list of [`IndexSpec`]s in configuration order.
#[derive(Debug, Clone, Default)]
pub struct IndexSpecStore {
    specs: Vec<IndexSpec>,
}

impl IndexSpecStore {
    /// Parses and validates the `indices` entries of a schema config.
    ///
    /// Fails on the first entry with a missing/empty `model_type` or `keys`,
    /// an invalid direction, or a name already used for the same model type.
    pub fn load(config: &SchemaConfig) -> SchemaResult<Self> {
        let specs = config
            .indices
            .iter()
            .enumerate()
            .map(|(position, entry)| parse_entry(position, entry))
            .collect::<SchemaResult<Vec<_>>>()?;
        Self::from_specs(specs)
    }

    /// Builds a store from already-constructed specs, applying the same invariants.
    pub fn from_specs(specs: Vec<IndexSpec>) -> SchemaResult<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if spec.model_type.is_empty() {
                return Err(SchemaError::Config(format!(
                    "index '{}' has an empty model_type",
                    spec.name
                )));
            }
            if spec.keys.is_empty() {
                return Err(SchemaError::Config(format!(
                    "index '{}' for model '{}' has no keys",
                    spec.name, spec.model_type
                )));
            }
            if !seen.insert((spec.model_type.as_str(), spec.name.as_str())) {
                return Err(SchemaError::Config(format!(
                    "duplicate index name '{}' for model '{}'",
                    spec.name, spec.model_type
                )));
            }
        }
        debug!(count = specs.len(), "Loaded index specs");
        Ok(Self { specs })
    }

    /// Returns every spec when `scope` is `None`, otherwise only the specs
    /// for that model type. Configuration order is preserved.
    pub fn list(&self, scope: Option<&str>) -> Vec<&IndexSpec> {
        match scope {
            None => self.specs.iter().collect(),
            Some(model_type) => self
                .specs
                .iter()
                .filter(|spec| spec.model_type == model_type)
                .collect(),
        }
    }

    /// Distinct model types, in order of first appearance.
    pub fn model_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.specs
            .iter()
            .map(|spec| spec.model_type.as_str())
            .filter(|model_type| seen.insert(*model_type))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn parse_entry(position: usize, entry: &IndexEntry) -> SchemaResult<IndexSpec> {
    let label = match &entry.name {
        Some(name) => format!("index '{name}'"),
        None => format!("index #{}", position + 1),
    };

    let model_type = match entry.model_type.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        Some(_) => return Err(SchemaError::Config(format!("{label}: model_type is empty"))),
        None => return Err(SchemaError::Config(format!("{label}: missing model_type"))),
    };

    let raw_keys = match entry.keys.as_deref() {
        Some(keys) if !keys.is_empty() => keys,
        Some(_) => return Err(SchemaError::Config(format!("{label}: keys is empty"))),
        None => return Err(SchemaError::Config(format!("{label}: missing keys"))),
    };

    let mut keys = Vec::with_capacity(raw_keys.len());
    for (field, direction) in raw_keys {
        if field.trim().is_empty() {
            return Err(SchemaError::Config(format!("{label}: key field is empty")));
        }
        let direction = IndexDirection::try_from(*direction)
            .map_err(|e| SchemaError::Config(format!("{label}: field '{field}': {e}")))?;
        keys.push(IndexKey {
            field: field.clone(),
            direction,
        });
    }

    let name = match entry.name.as_deref() {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        Some(_) => return Err(SchemaError::Config(format!("{label}: name is empty"))),
        None => derive_index_name(&keys),
    };

    Ok(IndexSpec {
        model_type,
        name,
        keys,
        options: IndexOptions::from_map(entry.options.clone()),
    })
}
