//! Statement logging for persisters.
//!
//! Every statement a persister executes is handed to a [`QueryLogger`].
//! [`TracingQueryLogger`] forwards to `tracing`; [`ProfilingCollector`]
//! keeps the statements in memory so a run can report what it executed.

use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub trait QueryLogger: Send + Sync {
    fn log_query(&self, sql: &str, elapsed: Duration);
}

/// Emits one `debug` event per statement on the `modlr::query` target.
#[derive(Debug, Default)]
pub struct TracingQueryLogger;

impl QueryLogger for TracingQueryLogger {
    fn log_query(&self, sql: &str, elapsed: Duration) {
        debug!(
            target: "modlr::query",
            elapsed_us = elapsed.as_micros() as u64,
            sql,
            "Executed statement"
        );
    }
}

/// One statement captured by a [`ProfilingCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub sql: String,
    pub elapsed: Duration,
}

/// In-memory statement recorder, used when a persister has profiling enabled.
#[derive(Debug, Default)]
pub struct ProfilingCollector {
    records: Mutex<Vec<QueryRecord>>,
}

impl ProfilingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in execution order.
    pub fn records(&self) -> Vec<QueryRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn query_count(&self) -> usize {
        self.records().len()
    }

    pub fn total_time(&self) -> Duration {
        self.records().iter().map(|r| r.elapsed).sum()
    }
}

impl QueryLogger for ProfilingCollector {
    fn log_query(&self, sql: &str, elapsed: Duration) {
        let record = QueryRecord {
            sql: sql.to_string(),
            elapsed,
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
