//! Declarative index reconciliation and schema provisioning for Modlr.
//!
//! Given the configured index list and a set of model types, the
//! [`Reconciler`] makes sure the corresponding structures exist in a
//! backing store and reports one outcome per item.
//!
//! # Architecture
//!
//! - [`IndexSpecStore`] holds the validated, immutable index declarations
//! - [`MetadataProvider`] resolves model metadata ([`MetadataRegistry`] is the
//!   config-driven implementation)
//! - [`BackingStore`] exposes the engine's `create_index` / `create_schemata`
//!   primitives; implementations live in `modlr-storage`
//! - [`Reconciler`] drives both operations with per-item failure isolation
//!
//! Configuration errors are fatal and raised before any side effect. Every
//! other failure is recorded in the [`ReconciliationReport`].

mod adapter;
mod config;
mod error;
mod reconciler;
mod registry;
mod report;
mod spec_store;

pub use adapter::{BackingStore, MetadataProvider, Provisioned};
pub use config::{IndexEntry, ModelConfig, SchemaConfig};
pub use error::{AdapterError, SchemaError, SchemaResult};
pub use reconciler::{CancellationFlag, ReconcileObserver, Reconciler, ReconcilerOptions};
pub use registry::MetadataRegistry;
pub use report::{
    Outcome, ReconcileMode, ReconciliationReport, ReconciliationResult, RunSummary, Target,
};
pub use spec_store::IndexSpecStore;
