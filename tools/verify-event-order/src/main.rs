//! verify-event-order
//!
//! Validates recorded event transcripts (replay documents) used as golden
//! fixtures: required fields, unique event ids, non-decreasing `ts_ms`, and
//! dependencies that only point backwards.
//!
//! Prints one `OK ✓ <path>` line per clean file and one
//! `ERROR (<rank>) <path>: <message>` line per issue. The exit status is the
//! worst rank seen: 1 load, 2 schema, 3 order, 0 when everything passed.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fixtures_telemetry::Config;
use tracing::info;

/// Verify causal ordering of recorded event transcripts.
#[derive(Debug, Parser)]
#[command(name = "verify-event-order")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Replay documents, or directories whose .yaml/.yml/.json files are checked.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::from_env()?;
    config.init_tracing();

    info!(paths = cli.paths.len(), "Verifying event order");
    let summary = fixtures_events::verify_paths(&cli.paths);

    fixtures_events::write_report(&summary, io::stdout().lock())
        .context("failed to write report")?;

    info!(
        files = summary.results.len(),
        issues = summary.issue_count(),
        exit_code = summary.exit_code(),
        "Verification finished"
    );
    Ok(summary.exit_code())
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
