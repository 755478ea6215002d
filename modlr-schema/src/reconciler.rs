//! Reconciler: makes declared indices and schemata exist in the backing store.
//!
//! Both operations follow the same shape: resolve the candidates for a scope,
//! make one side-effecting call per candidate, turn any per-item error into a
//! `Failed` outcome, and return the full ordered report. Only configuration
//! errors abort, and those surface before a `Reconciler` exists.

use crate::adapter::{BackingStore, MetadataProvider, Provisioned};
use crate::config::SchemaConfig;
use crate::error::SchemaResult;
use crate::report::{
    Outcome, ReconcileMode, ReconciliationReport, ReconciliationResult, Target,
};
use crate::spec_store::IndexSpecStore;
use modlr_model::{IndexOptions, IndexSpec, OPTION_BACKGROUND, OPTION_NAME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Tuning for a [`Reconciler`].
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Force `background: true` on every index whose backing store supports it.
    pub force_background: bool,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            force_background: true,
        }
    }
}

/// Cooperative cancellation, checked before each item.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives progress while a run is in flight.
pub trait ReconcileObserver {
    /// Called once with the number of resolved candidates, before any work.
    fn on_plan(&mut self, mode: ReconcileMode, scope: Option<&str>, count: usize) {
        let _ = (mode, scope, count);
    }

    fn on_start(&mut self, target: &Target) {
        let _ = target;
    }

    fn on_result(&mut self, result: &ReconciliationResult) {
        let _ = result;
    }
}

struct NoopObserver;

impl ReconcileObserver for NoopObserver {}

pub struct Reconciler {
    specs: IndexSpecStore,
    metadata: Arc<dyn MetadataProvider>,
    store: Arc<dyn BackingStore>,
    options: ReconcilerOptions,
    cancel: CancellationFlag,
}

impl Reconciler {
    pub fn new(
        specs: IndexSpecStore,
        metadata: Arc<dyn MetadataProvider>,
        store: Arc<dyn BackingStore>,
    ) -> Self {
        Self {
            specs,
            metadata,
            store,
            options: ReconcilerOptions::default(),
            cancel: CancellationFlag::new(),
        }
    }

    /// Loads the index specs from `config` and builds a reconciler.
    ///
    /// A malformed config fails here, before either collaborator is touched.
    pub fn from_config(
        config: &SchemaConfig,
        metadata: Arc<dyn MetadataProvider>,
        store: Arc<dyn BackingStore>,
    ) -> SchemaResult<Self> {
        let specs = IndexSpecStore::load(config)?;
        Ok(Self::new(specs, metadata, store))
    }

    pub fn with_options(mut self, options: ReconcilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn specs(&self) -> &IndexSpecStore {
        &self.specs
    }

    /// Ensures every declared index in `scope` (all types when `None`) exists.
    pub fn reconcile_indices(&self, scope: Option<&str>) -> ReconciliationReport {
        self.reconcile_indices_with_observer(scope, &mut NoopObserver)
    }

    pub fn reconcile_indices_with_observer(
        &self,
        scope: Option<&str>,
        observer: &mut dyn ReconcileObserver,
    ) -> ReconciliationReport {
        let specs = self.specs.list(scope);
        self.run(
            ReconcileMode::Indices,
            scope,
            specs,
            |spec| Target::Index((*spec).clone()),
            |spec| self.create_index(spec),
            observer,
        )
    }

    /// Ensures the storage schema for `scope` (all known types when `None`) exists.
    pub fn reconcile_schemata(&self, scope: Option<&str>) -> ReconciliationReport {
        self.reconcile_schemata_with_observer(scope, &mut NoopObserver)
    }

    pub fn reconcile_schemata_with_observer(
        &self,
        scope: Option<&str>,
        observer: &mut dyn ReconcileObserver,
    ) -> ReconciliationReport {
        let types = match scope {
            Some(model_type) => vec![model_type.to_string()],
            None => self.metadata.all_known_types(),
        };
        self.run(
            ReconcileMode::Schemata,
            scope,
            types,
            |model_type| Target::Model(model_type.clone()),
            |model_type| self.create_schemata(model_type),
            observer,
        )
    }

    fn run<C>(
        &self,
        mode: ReconcileMode,
        scope: Option<&str>,
        candidates: Vec<C>,
        target_of: impl Fn(&C) -> Target,
        act: impl Fn(&C) -> Result<Provisioned, String>,
        observer: &mut dyn ReconcileObserver,
    ) -> ReconciliationReport {
        let mut report = ReconciliationReport::new(mode, scope);
        let span = info_span!("reconcile", run_id = %report.run_id, %mode);
        let _guard = span.enter();

        info!(
            scope = scope.unwrap_or("all types"),
            count = candidates.len(),
            "Starting reconciliation"
        );
        observer.on_plan(mode, scope, candidates.len());

        for candidate in &candidates {
            if self.cancel.is_cancelled() {
                warn!(
                    processed = report.results.len(),
                    remaining = candidates.len() - report.results.len(),
                    "Reconciliation cancelled"
                );
                report.cancelled = true;
                break;
            }

            let target = target_of(candidate);
            observer.on_start(&target);

            let outcome = match act(candidate) {
                Ok(Provisioned::Created) => {
                    info!(item = %target, "Created");
                    Outcome::Created
                }
                Ok(Provisioned::AlreadyExists) => {
                    debug!(item = %target, "Already exists");
                    Outcome::AlreadyExists
                }
                Err(reason) => {
                    warn!(item = %target, %reason, "Reconciliation failed");
                    Outcome::Failed(reason)
                }
            };

            let result = ReconciliationResult { target, outcome };
            observer.on_result(&result);
            report.results.push(result);
        }

        info!(summary = %report.summary(), "Reconciliation finished");
        report
    }

    fn create_index(&self, spec: &IndexSpec) -> Result<Provisioned, String> {
        let metadata = self
            .metadata
            .metadata_for_type(&spec.model_type)
            .map_err(|e| e.to_string())?;
        let options = self.merged_options(spec, self.store.supports_background_build(&metadata));
        self.store
            .create_index(&metadata, &spec.keys, &options)
            .map_err(|e| e.to_string())
    }

    fn create_schemata(&self, model_type: &str) -> Result<Provisioned, String> {
        let metadata = self
            .metadata
            .metadata_for_type(model_type)
            .map_err(|e| e.to_string())?;
        self.store
            .create_schemata(&metadata)
            .map_err(|e| e.to_string())
    }

    fn merged_options(&self, spec: &IndexSpec, background_supported: bool) -> IndexOptions {
        let mut options = spec.options.clone();
        if self.options.force_background && background_supported {
            options.set(OPTION_BACKGROUND, true);
        }
        if !options.contains(OPTION_NAME) {
            options.set(OPTION_NAME, spec.name.as_str());
        }
        options
    }
}
