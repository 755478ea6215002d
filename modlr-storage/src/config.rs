//! `[persisters.<name>]` configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persister type backed by [`SqliteStore`](crate::SqliteStore).
pub const SQLITE_PERSISTER: &str = "sqlite";

/// Path value that opens a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersisterConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parameters: PersisterParameters,
}

impl PersisterConfig {
    /// A SQLite persister at `path` with default parameters.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SQLITE_PERSISTER.to_string(),
            parameters: PersisterParameters {
                path: Some(path.into()),
                ..PersisterParameters::default()
            },
        }
    }

    /// Makes a relative database path relative to `base` instead of the working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(path) = &self.parameters.path {
            if path.is_relative() && path.as_os_str() != IN_MEMORY_PATH {
                self.parameters.path = Some(base.join(path));
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersisterParameters {
    /// Database file, or `:memory:`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Record executed statements in a [`ProfilingCollector`](crate::ProfilingCollector)
    /// instead of logging them.
    #[serde(default)]
    pub profiling: bool,
    #[serde(default)]
    pub options: SqliteOptions,
}

/// Connection options for SQLite persisters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteOptions {
    /// How long to wait on a locked database before failing.
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}
