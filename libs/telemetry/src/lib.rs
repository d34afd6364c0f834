//! Shared configuration and logging setup for the fixture tools.
//!
//! Logs always go to stderr; stdout belongs to each tool's report.

use std::io;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `FIXTURES_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{other}' (expected text or json)"),
        }
    }
}

/// Tool configuration (env-driven).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log filter directive (trace, debug, info, warn, error, or full
    /// `EnvFilter` syntax).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("FIXTURES_LOG_LEVEL")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_format = lookup("FIXTURES_LOG_FORMAT")
            .map(|format| format.parse::<LogFormat>())
            .transpose()
            .context("FIXTURES_LOG_FORMAT must be 'text' or 'json'.")?
            .unwrap_or_default();

        Ok(Self {
            log_level,
            log_format,
        })
    }

    /// Install the global tracing subscriber (prefer RUST_LOG, fall back to
    /// the configured level).
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(io::stderr),
                )
                .init(),
        }
    }
}
