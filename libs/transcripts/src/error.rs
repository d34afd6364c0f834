//! Error types for transcript normalization.

use thiserror::Error;

/// Errors that can occur when normalizing a transcript.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The top-level value is not an array.
    #[error("transcript must be a JSON array of exchange records, found {0}")]
    NotAnArray(&'static str),

    /// A record is not an object.
    #[error("record {index} must be a JSON object, found {found}")]
    RecordNotObject { index: usize, found: &'static str },

    /// A required field is absent.
    #[error("record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// The direction is not `send` or `receive`.
    #[error("record {index} direction must be one of send, receive; got {found}")]
    InvalidDirection { index: usize, found: String },

    /// The timestamp is not ISO-8601.
    #[error("record {index} has invalid ISO-8601 timestamp: {found}")]
    InvalidTimestamp { index: usize, found: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TranscriptError {
    fn from(err: serde_json::Error) -> Self {
        TranscriptError::Serialization(err.to_string())
    }
}
