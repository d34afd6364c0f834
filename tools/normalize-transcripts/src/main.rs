//! normalize-transcripts
//!
//! Normalizes client transcript JSON files so captured exchanges diff
//! reliably across platforms.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use fixtures_telemetry::Config;
use fixtures_transcripts::Normalized;
use tracing::{debug, info};

/// Normalize client transcript JSON files for deterministic diffs.
#[derive(Debug, Parser)]
#[command(name = "normalize-transcripts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transcript JSON files to normalize.
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Rewrite each transcript in place instead of printing to stdout.
    #[arg(long)]
    in_place: bool,

    /// Write the normalized transcript to this path (single input only).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Exit with status 1 if any transcript would change; writes nothing.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        if self.output.is_some() && self.paths.len() != 1 {
            bail!("--output can only be used with a single input path");
        }
        if !self.in_place && !self.check && self.output.is_none() && self.paths.len() > 1 {
            bail!("provide --in-place or --output when normalizing multiple files");
        }
        Ok(())
    }
}

/// Normalize one file and emit it. Returns whether the content changed.
fn process_file(cli: &Cli, path: &Path) -> Result<bool> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let normalized = Normalized::new(&contents).with_context(|| format!("{}", path.display()))?;
    debug!(path = %path.display(), changed = normalized.changed, "Normalized transcript");

    if cli.check {
        return Ok(normalized.changed);
    }

    if let Some(output) = &cli.output {
        std::fs::write(output, &normalized.output)
            .with_context(|| format!("failed to write {}", output.display()))?;
    } else if cli.in_place {
        if normalized.changed {
            std::fs::write(path, &normalized.output)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    } else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(normalized.output.as_bytes())
            .context("failed to write to stdout")?;
        stdout.flush().context("failed to write to stdout")?;
    }
    Ok(normalized.changed)
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::from_env()?;
    config.init_tracing();
    cli.validate()?;

    let mut drifted = Vec::new();
    for path in &cli.paths {
        if process_file(&cli, path)? {
            drifted.push(path);
        }
    }

    info!(
        files = cli.paths.len(),
        changed = drifted.len(),
        check = cli.check,
        "Normalization finished"
    );

    if cli.check && !drifted.is_empty() {
        for path in drifted {
            eprintln!("{} {}", "would reformat".yellow(), path.display());
        }
        return Ok(1);
    }
    Ok(0)
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
