//! Per-item outcomes and run summaries.

use modlr_model::IndexSpec;
use std::fmt;
use uuid::Uuid;

/// Which structures a run provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    Indices,
    Schemata,
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indices => write!(f, "indices"),
            Self::Schemata => write!(f, "schemata"),
        }
    }
}

/// The item a result refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Index(IndexSpec),
    Model(String),
}

impl Target {
    pub fn model_type(&self) -> &str {
        match self {
            Self::Index(spec) => &spec.model_type,
            Self::Model(model_type) => model_type,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(spec) => write!(f, "index {} for model {}", spec.name, spec.model_type),
            Self::Model(model_type) => write!(f, "schema for model {model_type}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyExists => write!(f, "already exists"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub target: Target,
    pub outcome: Outcome,
}

/// Everything one reconciliation run produced.
#[derive(Debug, Clone)]
pub struct ReconciliationReport {
    pub run_id: Uuid,
    pub mode: ReconcileMode,
    pub scope: Option<String>,
    pub results: Vec<ReconciliationResult>,
    /// Set when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl ReconciliationReport {
    pub(crate) fn new(mode: ReconcileMode, scope: Option<&str>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            mode,
            scope: scope.map(str::to_string),
            results: Vec::new(),
            cancelled: false,
        }
    }

    pub fn results(&self) -> &[ReconciliationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ReconciliationResult> {
        self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReconciliationResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for result in &self.results {
            match result.outcome {
                Outcome::Created => summary.created += 1,
                Outcome::AlreadyExists => summary.already_existing += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub created: usize,
    pub already_existing: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.created + self.already_existing + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} already existed, {} failed",
            self.created, self.already_existing, self.failed
        )
    }
}
