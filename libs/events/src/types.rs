//! Verification result types.

use std::fmt;
use std::path::PathBuf;

/// Severity of a verification issue.
///
/// The discriminant is the issue's rank, which doubles as the process exit
/// code when it is the worst severity seen in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The file is missing, unreadable, or not valid YAML.
    Load = 1,
    /// A structural or type violation.
    Schema = 2,
    /// A causal or temporal ordering violation.
    Order = 3,
}

impl Severity {
    /// Numeric rank used in report lines and exit codes.
    pub const fn rank(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Load => write!(f, "load"),
            Severity::Schema => write!(f, "schema"),
            Severity::Order => write!(f, "order"),
        }
    }
}

/// A single problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    pub severity: Severity,
}

impl Issue {
    pub fn load(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Load,
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Schema,
        }
    }

    pub fn order(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Order,
        }
    }
}

/// Outcome of verifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub path: PathBuf,
    pub issues: Vec<Issue>,
    /// The file is a recognized manifest-only shape that is not validated.
    pub skipped: bool,
}

impl VerificationResult {
    pub fn checked(path: impl Into<PathBuf>, issues: Vec<Issue>) -> Self {
        Self {
            path: path.into(),
            issues,
            skipped: false,
        }
    }

    pub fn skipped(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issues: Vec::new(),
            skipped: true,
        }
    }

    /// Validated and found no issues. Skipped results are not clean.
    pub fn is_clean(&self) -> bool {
        !self.skipped && self.issues.is_empty()
    }

    /// Worst severity among this result's issues.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }
}

/// Results for every file processed in one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    pub fn push(&mut self, result: VerificationResult) {
        self.results.push(result);
    }

    /// Worst severity across all results.
    pub fn max_severity(&self) -> Option<Severity> {
        self.results
            .iter()
            .filter_map(VerificationResult::max_severity)
            .max()
    }

    /// Process exit code: the worst severity rank, or 0 when nothing was found.
    pub fn exit_code(&self) -> i32 {
        self.max_severity().map_or(0, Severity::rank)
    }

    pub fn issue_count(&self) -> usize {
        self.results.iter().map(|result| result.issues.len()).sum()
    }
}

// =============================================================================
// Tests
// =============================================================================
