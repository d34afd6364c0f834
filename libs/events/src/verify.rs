//! Verification pipeline: resolve candidates, load, validate, aggregate.

use std::path::Path;

use tracing::{debug, warn};

use crate::loader::{load_document, resolve_candidates};
use crate::schema::{validate_document, DocumentOutcome};
use crate::types::{Issue, VerificationResult, VerificationSummary};

/// Verify a single document file.
pub fn verify_file(path: &Path) -> VerificationResult {
    let document = match load_document(path) {
        Ok(document) => document,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load document");
            return VerificationResult::checked(path, vec![Issue::load(e.to_string())]);
        }
    };

    match validate_document(&document) {
        DocumentOutcome::Skipped => {
            debug!(path = %path.display(), "Skipping manifest-only document");
            VerificationResult::skipped(path)
        }
        DocumentOutcome::Checked(issues) => {
            debug!(path = %path.display(), issues = issues.len(), "Validated document");
            VerificationResult::checked(path, issues)
        }
    }
}

/// Verify a file, or every document in a directory in file-name order.
pub fn verify_path(path: &Path) -> Vec<VerificationResult> {
    resolve_candidates(path)
        .iter()
        .map(|candidate| verify_file(candidate))
        .collect()
}

/// Verify each path in argument order. A failure in one path never stops
/// the others.
pub fn verify_paths<P: AsRef<Path>>(paths: &[P]) -> VerificationSummary {
    let mut summary = VerificationSummary::default();
    for path in paths {
        for result in verify_path(path.as_ref()) {
            summary.push(result);
        }
    }
    summary
}

