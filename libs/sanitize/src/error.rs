//! Error types for JSONL sanitization.

use thiserror::Error;

/// A record that violates the expected schema, or an I/O failure while
/// streaming. Schema variants carry the 1-based input line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("line {line}: invalid JSON: {message}")]
    InvalidJson { line: usize, message: String },

    #[error("line {line}: record must be a JSON object")]
    NotAnObject { line: usize },

    #[error("line {line}: unsupported scenario '{found}'")]
    UnsupportedScenario { line: usize, found: String },

    #[error("line {line}: tenant must be a non-empty string")]
    InvalidTenant { line: usize },

    #[error("line {line}: missing '{field}' field")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: '{field}' must be of type {expected}")]
    WrongType {
        line: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: {field} must be {bound}")]
    OutOfRange {
        line: usize,
        field: &'static str,
        bound: &'static str,
    },

    #[error("line {line}: unsupported operation '{found}'")]
    UnsupportedOperation { line: usize, found: String },

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SanitizeError {
    fn from(err: std::io::Error) -> Self {
        SanitizeError::Io(err.to_string())
    }
}
