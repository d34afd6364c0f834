//! Candidate discovery and document parsing.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::LoadError;

/// Extensions recognized as structured text when expanding a directory.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Expand a path argument into the documents to verify.
///
/// Directories expand to their direct-child document files sorted by file
/// name; symlinks are followed. A directory without any falls back to itself so that loading it
/// reports a load error instead of silently passing.
pub fn resolve_candidates(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    let files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|candidate| has_document_extension(candidate))
        .collect();

    debug!(dir = %path.display(), count = files.len(), "Expanded directory");

    if files.is_empty() {
        return vec![path.to_path_buf()];
    }
    files
}

/// Parse document text.
pub fn parse_document(path: &Path, contents: &str) -> Result<Value, LoadError> {
    serde_yaml::from_str(contents).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse a document from disk.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_document(path, &contents)
}
