//! Routes schema operations to the persister that owns each model.

use crate::config::{PersisterConfig, IN_MEMORY_PATH, SQLITE_PERSISTER};
use crate::error::{StorageError, StorageResult};
use crate::logger::{ProfilingCollector, TracingQueryLogger};
use crate::sqlite::SqliteStore;
use modlr_model::{IndexKey, IndexOptions, ModelMetadata};
use modlr_schema::{AdapterError, BackingStore, Provisioned};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Named persisters, selected per call by [`ModelMetadata::persister`].
#[derive(Default)]
pub struct Store {
    persisters: BTreeMap<String, Arc<dyn BackingStore>>,
    profilers: BTreeMap<String, Arc<ProfilingCollector>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every configured persister.
    ///
    /// Only the `sqlite` type is built in. Every entry is checked (type and
    /// `path`) before any database is opened.
    pub fn from_config(config: &BTreeMap<String, PersisterConfig>) -> StorageResult<Self> {
        let mut paths = Vec::with_capacity(config.len());
        for (name, persister) in config {
            if persister.kind != SQLITE_PERSISTER {
                return Err(StorageError::UnsupportedPersister(persister.kind.clone()));
            }
            let path = persister.parameters.path.as_deref().ok_or_else(|| {
                StorageError::InvalidData(format!("persister '{name}' requires parameters.path"))
            })?;
            paths.push((name, persister, path));
        }

        let mut store = Self::new();
        for (name, persister, path) in paths {
            store.add_sqlite(name, persister, path)?;
        }
        Ok(store)
    }

    fn add_sqlite(
        &mut self,
        name: &str,
        config: &PersisterConfig,
        path: &Path,
    ) -> StorageResult<()> {
        let params = &config.parameters;
        let sqlite = if path.as_os_str() == IN_MEMORY_PATH {
            SqliteStore::open_in_memory()?
        } else {
            SqliteStore::open(path, &params.options)?
        };

        let sqlite = if params.profiling {
            let collector = Arc::new(ProfilingCollector::new());
            self.profilers.insert(name.to_string(), Arc::clone(&collector));
            sqlite.with_logger(collector)
        } else {
            sqlite.with_logger(Arc::new(TracingQueryLogger))
        };

        info!(persister = %name, profiling = params.profiling, "Registered sqlite persister");
        self.add_persister(name, Arc::new(sqlite))
    }

    /// Registers a persister under `name`. Names must be unique.
    pub fn add_persister(
        &mut self,
        name: &str,
        persister: Arc<dyn BackingStore>,
    ) -> StorageResult<()> {
        if self.persisters.contains_key(name) {
            return Err(StorageError::InvalidData(format!(
                "persister '{name}' registered twice"
            )));
        }
        self.persisters.insert(name.to_string(), persister);
        Ok(())
    }

    pub fn persister(&self, name: &str) -> StorageResult<&Arc<dyn BackingStore>> {
        self.persisters
            .get(name)
            .ok_or_else(|| StorageError::PersisterNotFound(name.to_string()))
    }

    pub fn persister_names(&self) -> impl Iterator<Item = &str> {
        self.persisters.keys().map(String::as_str)
    }

    /// Collector of a persister with profiling enabled.
    pub fn profiler(&self, name: &str) -> Option<&Arc<ProfilingCollector>> {
        self.profilers.get(name)
    }

    pub fn profilers(&self) -> impl Iterator<Item = (&str, &Arc<ProfilingCollector>)> {
        self.profilers.iter().map(|(name, c)| (name.as_str(), c))
    }

    fn route(&self, metadata: &ModelMetadata) -> Result<&Arc<dyn BackingStore>, AdapterError> {
        self.persister(&metadata.persister).map_err(Into::into)
    }
}

impl BackingStore for Store {
    fn create_index(
        &self,
        metadata: &ModelMetadata,
        keys: &[IndexKey],
        options: &IndexOptions,
    ) -> Result<Provisioned, AdapterError> {
        self.route(metadata)?.create_index(metadata, keys, options)
    }

    fn create_schemata(&self, metadata: &ModelMetadata) -> Result<Provisioned, AdapterError> {
        self.route(metadata)?.create_schemata(metadata)
    }

    fn supports_background_build(&self, metadata: &ModelMetadata) -> bool {
        self.route(metadata)
            .map(|p| p.supports_background_build(metadata))
            .unwrap_or(false)
    }
}
