//! sbom-merge
//!
//! Folds every `*.cdx.json` below a root into one CycloneDX document.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fixtures_telemetry::Config;
use tracing::info;

/// Merge CycloneDX .cdx.json files.
#[derive(Debug, Parser)]
#[command(name = "sbom-merge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Write the merged SBOM to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Root directory to search.
    #[arg(long, default_value = ".", value_name = "DIR")]
    root: PathBuf,
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    config.init_tracing();

    let sbom = fixtures_sbom::merge_tree(&cli.root);
    info!(
        root = %cli.root.display(),
        components = sbom.components.len(),
        "Merged SBOMs"
    );

    match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            sbom.write_to(BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => sbom
            .write_to(io::stdout().lock())
            .context("failed to write SBOM to stdout")?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
