//! Console rendering of reconciliation runs and index listings.

use modlr_model::IndexSpec;
use modlr_schema::{ReconcileMode, ReconcileObserver, ReconciliationResult, Target};
use modlr_storage::ProfilingCollector;
use serde_json::Value;
use std::io::{self, Write};

/// Prints a header, one line per item and nothing else; the caller prints
/// the closing summary once the report is back.
///
/// Observer callbacks cannot fail, so the first write error is held and
/// surfaced by [`ConsoleObserver::finish`].
pub struct ConsoleObserver<'a> {
    out: &'a mut dyn Write,
    error: Option<io::Error>,
}

impl<'a> ConsoleObserver<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, error: None }
    }

    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => self.out.flush(),
        }
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            self.error = Some(e);
        }
    }
}

impl ReconcileObserver for ConsoleObserver<'_> {
    fn on_plan(&mut self, mode: ReconcileMode, scope: Option<&str>, count: usize) {
        let line = plan_header(mode, scope, count);
        self.emit(&format!("{line}\n"));
    }

    fn on_start(&mut self, target: &Target) {
        self.emit(&format!("    Creating {target} ... "));
    }

    fn on_result(&mut self, result: &ReconciliationResult) {
        self.emit(&format!("{}\n", result.outcome));
    }
}

/// `Creating 2 indices for all types`, `Creating 1 schema for model type "user"`.
pub fn plan_header(mode: ReconcileMode, scope: Option<&str>, count: usize) -> String {
    let noun = match (mode, count) {
        (ReconcileMode::Indices, 1) => "index",
        (ReconcileMode::Indices, _) => "indices",
        (ReconcileMode::Schemata, 1) => "schema",
        (ReconcileMode::Schemata, _) => "schemata",
    };
    match scope {
        Some(model_type) => format!("Creating {count} {noun} for model type \"{model_type}\""),
        None => format!("Creating {count} {noun} for all types"),
    }
}

/// `user  by_email  [["email",1]]  {"unique":true}`
pub fn index_line(spec: &IndexSpec) -> String {
    let keys: Vec<Value> = spec
        .keys
        .iter()
        .map(|k| {
            Value::from(vec![
                Value::from(k.field.as_str()),
                Value::from(k.direction.as_i64()),
            ])
        })
        .collect();
    format!(
        "{}  {}  {}  {}",
        spec.model_type,
        spec.name,
        Value::Array(keys),
        Value::Object(spec.options.as_map().clone())
    )
}

pub fn profiler_line(persister: &str, collector: &ProfilingCollector) -> String {
    format!(
        "Persister {persister}: {} statements in {:.3} ms",
        collector.query_count(),
        collector.total_time().as_secs_f64() * 1000.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use modlr_model::{IndexKey, IndexOptions};

    #[test]
    fn header_pluralizes() {
        assert_eq!(
            plan_header(ReconcileMode::Indices, None, 2),
            "Creating 2 indices for all types"
        );
        assert_eq!(
            plan_header(ReconcileMode::Indices, Some("user"), 1),
            "Creating 1 index for model type \"user\""
        );
        assert_eq!(
            plan_header(ReconcileMode::Schemata, None, 0),
            "Creating 0 schemata for all types"
        );
    }

    #[test]
    fn index_line_renders_keys_and_options() {
        let spec = IndexSpec::new("user", vec![IndexKey::asc("email"), IndexKey::desc("created")])
            .named("by_email")
            .with_options(IndexOptions::new().with("unique", true));
        assert_eq!(
            index_line(&spec),
            r#"user  by_email  [["email",1],["created",-1]]  {"unique":true}"#
        );
    }
}
