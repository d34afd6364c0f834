//! Structural validation of replay documents.
//!
//! Validation drives the ordering checks from [`crate::order`] while it walks
//! the events, so one pass yields every schema and order issue in document
//! order.

use serde_yaml::{Mapping, Value};

use crate::order::{SeenEvents, TimestampOrder};
use crate::types::Issue;

/// Mode for recorded event replays. Documents without a mode are replays.
pub const REPLAY_MODE: &str = "replay";

/// Mode for manifest-only documents that describe fixtures without events.
pub const CONFIG_MODE: &str = "config";

/// Outcome of validating one parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Recognized manifest-only shape; not subject to validation.
    Skipped,
    /// Validated; an empty list means the document passed.
    Checked(Vec<Issue>),
}

#[derive(Debug)]
enum Mode<'a> {
    Unset,
    Named(&'a str),
    Invalid(&'a Value),
}

impl<'a> Mode<'a> {
    fn of(root: &'a Mapping) -> Self {
        match root.get("mode") {
            None | Some(Value::Null) => Mode::Unset,
            Some(Value::String(mode)) => Mode::Named(mode),
            Some(other) => Mode::Invalid(other),
        }
    }

    fn allows_skip(&self) -> bool {
        matches!(self, Mode::Unset | Mode::Named(REPLAY_MODE | CONFIG_MODE))
    }

    fn unsupported(&self) -> Option<String> {
        match self {
            Mode::Unset | Mode::Named(REPLAY_MODE) => None,
            Mode::Named(mode) => Some(format!("unsupported mode '{mode}'")),
            Mode::Invalid(value) => Some(format!("unsupported mode {}", describe(value))),
        }
    }
}

/// Short rendering of a value's type for error messages.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn non_empty_str<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}

/// Validate a parsed document, returning whether it was skipped or the
/// issues found.
pub fn validate_document(document: &Value) -> DocumentOutcome {
    let Some(root) = document.as_mapping() else {
        return DocumentOutcome::Checked(vec![Issue::schema(format!(
            "document root must be a mapping, found {}",
            describe(document)
        ))]);
    };

    let mode = Mode::of(root);
    let events = root.get("events");
    if events.is_none() && mode.allows_skip() {
        return DocumentOutcome::Skipped;
    }

    let mut issues = Vec::new();
    if let Some(message) = mode.unsupported() {
        issues.push(Issue::schema(message));
    }

    for field in ["scenario", "source"] {
        if non_empty_str(root, field).is_none() {
            issues.push(Issue::schema(format!(
                "document must define a non-empty string '{field}'"
            )));
        }
    }

    match events.and_then(Value::as_sequence) {
        Some(events) if !events.is_empty() => validate_events(events, &mut issues),
        _ => issues.push(Issue::schema(
            "document must contain a non-empty 'events' list",
        )),
    }

    DocumentOutcome::Checked(issues)
}

fn validate_events(events: &[Value], issues: &mut Vec<Issue>) {
    let mut seen = SeenEvents::new();
    let mut timestamps = TimestampOrder::new();

    for (index, event) in events.iter().enumerate() {
        let Some(event) = event.as_mapping() else {
            issues.push(Issue::schema(format!(
                "events[{index}] must be a mapping, found {}",
                describe(event)
            )));
            continue;
        };

        let event_id = non_empty_str(event, "event_id");
        let label = match event_id {
            Some(id) => format!("event '{id}'"),
            None => format!("events[{index}]"),
        };

        let mut duplicate = false;
        match event_id {
            None => issues.push(Issue::schema(format!(
                "events[{index}] must define a non-empty string 'event_id'"
            ))),
            Some(id) => {
                if let Some(first) = seen.index_of(id) {
                    duplicate = true;
                    issues.push(Issue::schema(format!(
                        "duplicate event_id '{id}' at events[{index}] \
                         (first defined at events[{first}])"
                    )));
                }
            }
        }

        let ts_ms = match event.get("ts_ms") {
            None => {
                issues.push(Issue::schema(format!(
                    "{label} must define an integer 'ts_ms'"
                )));
                None
            }
            Some(value) => {
                let ts = integer(value);
                if ts.is_none() {
                    issues.push(Issue::schema(format!(
                        "{label} has non-integer 'ts_ms' ({})",
                        describe(value)
                    )));
                }
                ts
            }
        };

        match dependencies(event) {
            Ok(deps) => {
                if let Some(issue) = seen.check_dependencies(&label, &deps) {
                    issues.push(issue);
                }
            }
            Err(found) => issues.push(Issue::schema(format!(
                "{label} has malformed 'depends_on': expected a list of strings, found {found}"
            ))),
        }

        if let Some(ts_ms) = ts_ms {
            if let Some(issue) = timestamps.observe(&label, ts_ms) {
                issues.push(issue);
            }
        }

        if let (Some(id), false) = (event_id, duplicate) {
            seen.record(id, index);
        }
    }
}

/// Declared dependencies of an event. Absent, null, and empty are all "none".
/// On a malformed value, returns a description of what was found instead.
fn dependencies(event: &Mapping) -> Result<Vec<&str>, String> {
    let items = match event.get("depends_on") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(items)) => items,
        Some(other) => return Err(describe(other).to_string()),
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| format!("{} item", describe(item)))
        })
        .collect()
}
