//! Storage layer for Modlr.
//!
//! Provides the concrete [`BackingStore`](modlr_schema::BackingStore)
//! implementations the reconciler drives.
//!
//! # Architecture
//!
//! - [`SqliteStore`] is a single persister backed by one SQLite database
//! - [`Store`] holds the named persisters and routes each call by the
//!   model's configured persister
//! - Every executed statement goes through a [`QueryLogger`]: tracing by
//!   default, or a [`ProfilingCollector`] when profiling is enabled

mod config;
mod error;
mod logger;
mod sqlite;
mod store;

pub use config::{
    PersisterConfig, PersisterParameters, SqliteOptions, IN_MEMORY_PATH, SQLITE_PERSISTER,
};
pub use error::{StorageError, StorageResult};
pub use logger::{ProfilingCollector, QueryLogger, QueryRecord, TracingQueryLogger};
pub use sqlite::SqliteStore;
pub use store::Store;
