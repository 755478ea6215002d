//! The `modlr.toml` configuration file.

use anyhow::{Context, Result};
use modlr_schema::{ModelConfig, SchemaConfig};
use modlr_storage::PersisterConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModlrConfig {
    #[serde(default)]
    pub persisters: BTreeMap<String, PersisterConfig>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl ModlrConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    /// Reads a config file. Relative database paths resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        if let Some(base) = path.parent() {
            for persister in config.persisters.values_mut() {
                persister.resolve_paths(base);
            }
        }

        info!(
            path = %path.display(),
            persisters = config.persisters.len(),
            models = config.models.len(),
            indices = config.schema.indices.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
