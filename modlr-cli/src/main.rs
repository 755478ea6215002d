//! Modlr schema tooling
//!
//! Creates the indices and storage schemata declared in a Modlr
//! configuration file. Safe to run repeatedly: anything that already
//! exists is reported and left alone.
//!
//! Usage:
//!   modlr --config modlr.toml create-indices [TYPE]
//!   modlr create-schemata [TYPE]
//!   modlr list-indices [TYPE]

use clap::Parser;
use modlr_cli::{execute, Cli, EXIT_FATAL};
use std::io;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&cli, &mut out) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
