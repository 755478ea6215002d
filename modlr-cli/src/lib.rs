//! Command-line front end for Modlr schema tooling.
//!
//! The binary is a thin shell around [`execute`], which loads the
//! configuration, wires the reconciler and renders each run to a writer.

pub mod config;
pub mod output;
pub mod wiring;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::ModlrConfig;
use modlr_schema::{IndexSpecStore, ReconcileMode, ReconciliationReport};
use output::ConsoleObserver;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modlr")]
#[command(about = "Create model indices and storage schemata from a Modlr configuration")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "MODLR_CONFIG", default_value = "modlr.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the declared indices, for one model type or all of them
    CreateIndices {
        #[arg(value_name = "TYPE")]
        model_type: Option<String>,
    },
    /// Create the storage schema, for one model type or all known types
    CreateSchemata {
        #[arg(value_name = "TYPE")]
        model_type: Option<String>,
    },
    /// Print the declared indices without touching storage
    ListIndices {
        #[arg(value_name = "TYPE")]
        model_type: Option<String>,
    },
}

impl Command {
    /// Scope of the command. An empty type means all types.
    pub fn scope(&self) -> Option<&str> {
        let model_type = match self {
            Self::CreateIndices { model_type }
            | Self::CreateSchemata { model_type }
            | Self::ListIndices { model_type } => model_type.as_deref(),
        };
        model_type.filter(|t| !t.is_empty())
    }
}

/// How a command ended, when it got far enough to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    ItemsFailed,
}

impl RunStatus {
    /// `0` on success, `1` when any item failed. Fatal errors exit with [`EXIT_FATAL`].
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ItemsFailed => 1,
        }
    }
}

/// Exit code for invalid configuration and other errors raised before any item runs.
pub const EXIT_FATAL: u8 = 2;

/// Runs one command, writing its console output to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<RunStatus> {
    let config = ModlrConfig::load(&cli.config)?;
    let scope = cli.command.scope();

    match &cli.command {
        Command::ListIndices { .. } => {
            let specs = IndexSpecStore::load(&config.schema).context("Invalid [schema] section")?;
            for spec in specs.list(scope) {
                writeln!(out, "{}", output::index_line(spec))?;
            }
            Ok(RunStatus::Success)
        }
        Command::CreateIndices { .. } => reconcile(&config, ReconcileMode::Indices, scope, out),
        Command::CreateSchemata { .. } => reconcile(&config, ReconcileMode::Schemata, scope, out),
    }
}

fn reconcile(
    config: &ModlrConfig,
    mode: ReconcileMode,
    scope: Option<&str>,
    out: &mut dyn Write,
) -> Result<RunStatus> {
    let services = wiring::build(config)?;

    let mut observer = ConsoleObserver::new(out);
    let report = match mode {
        ReconcileMode::Indices => services
            .reconciler
            .reconcile_indices_with_observer(scope, &mut observer),
        ReconcileMode::Schemata => services
            .reconciler
            .reconcile_schemata_with_observer(scope, &mut observer),
    };
    observer.finish().context("Failed to write progress")?;

    write_footer(&report, out)?;
    for (name, collector) in services.store.profilers() {
        writeln!(out, "{}", output::profiler_line(name, collector))?;
    }

    Ok(if report.has_failures() {
        RunStatus::ItemsFailed
    } else {
        RunStatus::Success
    })
}

fn write_footer(report: &ReconciliationReport, out: &mut dyn Write) -> Result<()> {
    if report.cancelled {
        writeln!(out, "Cancelled.")?;
    } else {
        writeln!(out, "Done!")?;
    }
    writeln!(out, "{}", report.summary())?;
    Ok(())
}
