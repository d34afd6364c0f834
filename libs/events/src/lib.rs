//! # fixtures-events
//!
//! Loading and causal-order verification of recorded event transcripts
//! (replay documents) used as golden fixtures.
//!
//! ## Document shape
//!
//! A replay document is a YAML (or JSON) mapping:
//!
//! ```yaml
//! scenario: fuzz
//! source: scripts/record_fs_events
//! events:
//!   - event_id: evt-1
//!     ts_ms: 0
//!     action: created
//!     path: repo/docs/README.md
//!   - event_id: evt-2
//!     ts_ms: 5
//!     action: modified
//!     path: repo/docs/README.md
//!     depends_on: [evt-1]
//! ```
//!
//! ## Rules
//!
//! - `event_id` is a non-empty string, unique within the document
//! - `ts_ms` is an integer and never decreases in document order
//! - every `depends_on` id refers to an event listed earlier
//! - documents without `events` whose mode is unset, `replay`, or `config`
//!   are manifests and are skipped rather than passed
//!
//! Every issue carries a [`Severity`] whose rank is also the exit code of a
//! run; the worst rank wins.

mod error;
pub mod loader;
pub mod order;
pub mod report;
pub mod schema;
mod types;
mod verify;

pub use error::LoadError;
pub use loader::{load_document, resolve_candidates};
pub use report::{render_report, write_report};
pub use schema::{validate_document, DocumentOutcome};
pub use types::*;
pub use verify::{verify_file, verify_path, verify_paths};
