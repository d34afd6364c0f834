//! Error types for loading replay documents.
//!
//! Messages omit the path because the reporter already prefixes every issue
//! line with it; use [`LoadError::path`] when the path is needed.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a replay document from disk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The path does not exist.
    #[error("file not found")]
    NotFound(PathBuf),

    /// The path exists but could not be read as UTF-8 text.
    #[error("failed to read file: {message}")]
    Read { path: PathBuf, message: String },

    /// The text is not a valid YAML (or JSON) document.
    #[error("invalid YAML: {message}")]
    Parse { path: PathBuf, message: String },
}

impl LoadError {
    /// The path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound(path) => path,
            LoadError::Read { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_do_not_repeat_path() {
        let err = LoadError::Parse {
            path: PathBuf::from("fixtures/watch.yaml"),
            message: "mapping values are not allowed here".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid YAML: mapping values are not allowed here"
        );
        assert_eq!(err.path(), Path::new("fixtures/watch.yaml"));
    }
}
