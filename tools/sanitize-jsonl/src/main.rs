//! sanitize-jsonl
//!
//! Validates archive builder JSONL records and replaces tenant names with
//! stable aliases. `-` selects stdin/stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fixtures_telemetry::Config;
use tracing::info;

const STDIO: &str = "-";

/// Sanitize archive builder JSONL output.
#[derive(Debug, Parser)]
#[command(name = "sanitize-jsonl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (defaults to stdin).
    #[arg(short, long, default_value = STDIO, value_name = "PATH")]
    input: PathBuf,

    /// Output file (defaults to stdout).
    #[arg(short, long, default_value = STDIO, value_name = "PATH")]
    output: PathBuf,
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIO {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == STDIO {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    config.init_tracing();

    let source = open_input(&cli.input)?;
    let destination = open_output(&cli.output)?;
    let written = fixtures_sanitize::sanitize_stream(source, destination)?;

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        records = written,
        "Sanitized JSONL"
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
