//! # fixtures-transcripts
//!
//! Canonical layout for captured client transcripts so that exchanges
//! recorded on different platforms diff cleanly.
//!
//! A transcript is a JSON array of exchange records:
//!
//! ```json
//! [
//!   {
//!     "direction": "send",
//!     "timestamp": "2024-03-01T12:00:00.000Z",
//!     "envelope": { "id": 1, "jsonrpc": "2.0", "method": "initialize" }
//!   }
//! ]
//! ```
//!
//! Normalization lowercases `direction`, converts `timestamp` to UTC with
//! millisecond precision, and sorts every nested object by key. Output is
//! two-space indented JSON with a trailing newline.

mod error;
pub mod normalize;

pub use error::TranscriptError;
pub use normalize::{
    normalize_record, normalize_timestamp, normalize_transcript, sort_json_value,
    NormalizedRecord,
};

/// Serialize normalized records in the canonical on-disk form.
pub fn serialize_records(records: &[NormalizedRecord]) -> Result<String, TranscriptError> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

/// Parse, normalize, and serialize transcript text.
pub fn normalize_str(contents: &str) -> Result<String, TranscriptError> {
    let value: serde_json::Value = serde_json::from_str(contents)
        .map_err(|e| TranscriptError::InvalidJson(e.to_string()))?;
    let records = normalize_transcript(&value)?;
    serialize_records(&records)
}

/// Outcome of normalizing one transcript's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub output: String,
    /// The output differs from the input.
    pub changed: bool,
}

impl Normalized {
    pub fn new(contents: &str) -> Result<Self, TranscriptError> {
        let output = normalize_str(contents)?;
        let changed = output != contents;
        Ok(Self { output, changed })
    }
}
