//! Plain-text report rendering.
//!
//! Line format:
//! - `OK ✓ <path>` for each clean file
//! - `ERROR (<rank>) <path>: <message>` for each issue
//!
//! Skipped documents produce no output.

use std::io::{self, Write};

use crate::types::{VerificationResult, VerificationSummary};

/// Report lines for one result.
pub fn result_lines(result: &VerificationResult) -> Vec<String> {
    if result.skipped {
        return Vec::new();
    }
    let path = result.path.display();
    if result.issues.is_empty() {
        return vec![format!("OK ✓ {path}")];
    }
    result
        .issues
        .iter()
        .map(|issue| {
            format!(
                "ERROR ({}) {path}: {}",
                issue.severity.rank(),
                issue.message
            )
        })
        .collect()
}

/// Report lines for a whole run, in processing order.
pub fn render_report(summary: &VerificationSummary) -> Vec<String> {
    summary.results.iter().flat_map(result_lines).collect()
}

/// Write the report, one line per clean file or issue.
pub fn write_report<W: Write>(summary: &VerificationSummary, mut out: W) -> io::Result<()> {
    for line in render_report(summary) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
