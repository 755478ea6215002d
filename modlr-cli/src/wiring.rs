//! Builds the object graph for a run from configuration.
//!
//! Everything that can be rejected from configuration alone is checked
//! before any persister opens a database.

use crate::config::ModlrConfig;
use anyhow::{bail, Context, Result};
use modlr_schema::{BackingStore, IndexSpecStore, MetadataRegistry, Reconciler};
use modlr_storage::Store;
use std::sync::Arc;

pub struct Services {
    pub reconciler: Reconciler,
    pub store: Arc<Store>,
}

pub fn build(config: &ModlrConfig) -> Result<Services> {
    let specs = IndexSpecStore::load(&config.schema).context("Invalid [schema] section")?;
    let registry =
        MetadataRegistry::from_models(&config.models).context("Invalid [[models]] section")?;

    for model in registry.models() {
        if !config.persisters.contains_key(&model.persister) {
            bail!(
                "model '{}' uses persister '{}', which is not configured",
                model.model_type,
                model.persister
            );
        }
    }

    let store = Arc::new(
        Store::from_config(&config.persisters).context("Invalid [persisters] section")?,
    );
    let backing: Arc<dyn BackingStore> = Arc::clone(&store) as Arc<dyn BackingStore>;
    let reconciler = Reconciler::new(specs, Arc::new(registry), backing);

    Ok(Services { reconciler, store })
}
