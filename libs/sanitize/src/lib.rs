//! # fixtures-sanitize
//!
//! Sanitizes archive builder JSONL output before it is checked in as a
//! fixture: each record is validated against its scenario's schema, tenant
//! names are replaced with stable aliases (`tenant-001`, `tenant-002`, ... in
//! order of first appearance), and every other field is dropped.
//!
//! Output is one compact JSON object per line. The first schema violation
//! stops the stream.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

mod error;

pub use error::SanitizeError;

pub const FUZZ_SCENARIO: &str = "fuzz";
pub const THROUGHPUT_SCENARIO: &str = "quota-throughput";

/// Operations a fuzz record may exercise.
pub const OPERATIONS: &[&str] = &["ingest", "plan", "commit", "audit", "prune"];

/// Upper bound for `saturation_ratio`; brief overload above 1.0 is expected.
pub const MAX_SATURATION_RATIO: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzRecord {
    pub scenario: &'static str,
    pub tenant_alias: String,
    pub operation: String,
    pub request_count: i64,
    pub budget_bytes: i64,
    pub overflow_expected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputRecord {
    pub scenario: &'static str,
    pub tenant_alias: String,
    pub window_seconds: i64,
    pub requests: i64,
    pub average_latency_ms: i64,
    /// Rounded to three decimal places.
    pub saturation_ratio: f64,
}

/// A sanitized record, serialized without any enum tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SanitizedRecord {
    Fuzz(FuzzRecord),
    Throughput(ThroughputRecord),
}

/// Typed access to a record's fields, tagged with its input line.
struct Fields<'a> {
    line: usize,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn get(&self, field: &'static str) -> Result<&'a Value, SanitizeError> {
        self.map.get(field).ok_or(SanitizeError::MissingField {
            line: self.line,
            field,
        })
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> SanitizeError {
        SanitizeError::WrongType {
            line: self.line,
            field,
            expected,
        }
    }

    fn out_of_range(&self, field: &'static str, bound: &'static str) -> SanitizeError {
        SanitizeError::OutOfRange {
            line: self.line,
            field,
            bound,
        }
    }

    fn string(&self, field: &'static str) -> Result<&'a str, SanitizeError> {
        self.get(field)?
            .as_str()
            .ok_or_else(|| self.wrong_type(field, "str"))
    }

    fn integer(&self, field: &'static str) -> Result<i64, SanitizeError> {
        self.get(field)?
            .as_i64()
            .ok_or_else(|| self.wrong_type(field, "int"))
    }

    fn boolean(&self, field: &'static str) -> Result<bool, SanitizeError> {
        self.get(field)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(field, "bool"))
    }

    fn number(&self, field: &'static str) -> Result<f64, SanitizeError> {
        self.get(field)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(field, "number"))
    }

    fn non_negative(&self, field: &'static str, value: i64) -> Result<i64, SanitizeError> {
        if value < 0 {
            return Err(self.out_of_range(field, "non-negative"));
        }
        Ok(value)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Stateful sanitizer; tenant aliases are stable for the life of a value.
#[derive(Debug, Default)]
pub struct Sanitizer {
    aliases: HashMap<String, String>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for `tenant`, assigning the next `tenant-NNN` on first use.
    pub fn alias_for(&mut self, tenant: &str) -> String {
        let next = self.aliases.len() + 1;
        self.aliases
            .entry(tenant.to_string())
            .or_insert_with(|| format!("tenant-{next:03}"))
            .clone()
    }

    /// Validate and sanitize one parsed record from input line `line`.
    pub fn sanitize_record(
        &mut self,
        line: usize,
        record: &Value,
    ) -> Result<SanitizedRecord, SanitizeError> {
        let Some(map) = record.as_object() else {
            return Err(SanitizeError::NotAnObject { line });
        };
        let fields = Fields { line, map };

        let scenario = match map.get("scenario") {
            Some(Value::String(s)) if s == FUZZ_SCENARIO || s == THROUGHPUT_SCENARIO => s.as_str(),
            Some(Value::String(s)) => {
                return Err(SanitizeError::UnsupportedScenario {
                    line,
                    found: s.clone(),
                })
            }
            other => {
                return Err(SanitizeError::UnsupportedScenario {
                    line,
                    found: other.map_or_else(|| "null".to_string(), Value::to_string),
                })
            }
        };

        let tenant = match map.get("tenant") {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(SanitizeError::InvalidTenant { line }),
        };
        let tenant_alias = self.alias_for(tenant);

        if scenario == FUZZ_SCENARIO {
            sanitize_fuzz(&fields, tenant_alias).map(SanitizedRecord::Fuzz)
        } else {
            sanitize_throughput(&fields, tenant_alias).map(SanitizedRecord::Throughput)
        }
    }

    /// Sanitize one raw input line. Blank lines yield `None`.
    pub fn sanitize_line(
        &mut self,
        line: usize,
        text: &str,
    ) -> Result<Option<SanitizedRecord>, SanitizeError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let record: Value =
            serde_json::from_str(text).map_err(|e| SanitizeError::InvalidJson {
                line,
                message: e.to_string(),
            })?;
        self.sanitize_record(line, &record).map(Some)
    }
}

fn sanitize_fuzz(fields: &Fields<'_>, tenant_alias: String) -> Result<FuzzRecord, SanitizeError> {
    let operation = fields.string("operation")?;
    let request_count = fields.integer("request_count")?;
    let budget_bytes = fields.integer("budget_bytes")?;
    let overflow_expected = fields.boolean("overflow_expected")?;

    let request_count = fields.non_negative("request_count", request_count)?;
    let budget_bytes = fields.non_negative("budget_bytes", budget_bytes)?;
    if !OPERATIONS.contains(&operation) {
        return Err(SanitizeError::UnsupportedOperation {
            line: fields.line,
            found: operation.to_string(),
        });
    }

    Ok(FuzzRecord {
        scenario: FUZZ_SCENARIO,
        tenant_alias,
        operation: operation.to_string(),
        request_count,
        budget_bytes,
        overflow_expected,
    })
}

fn sanitize_throughput(
    fields: &Fields<'_>,
    tenant_alias: String,
) -> Result<ThroughputRecord, SanitizeError> {
    let window_seconds = fields.integer("window_seconds")?;
    let requests = fields.integer("requests")?;
    let average_latency_ms = fields.integer("average_latency_ms")?;
    let ratio = fields.number("saturation_ratio")?;

    if window_seconds <= 0 {
        return Err(fields.out_of_range("window_seconds", "positive"));
    }
    let requests = fields.non_negative("requests", requests)?;
    let average_latency_ms = fields.non_negative("average_latency_ms", average_latency_ms)?;
    if !(0.0..=MAX_SATURATION_RATIO).contains(&ratio) {
        return Err(fields.out_of_range("saturation_ratio", "within [0.0, 1.5]"));
    }

    Ok(ThroughputRecord {
        scenario: THROUGHPUT_SCENARIO,
        tenant_alias,
        window_seconds,
        requests,
        average_latency_ms,
        saturation_ratio: round3(ratio),
    })
}

/// Sanitize a JSONL stream, writing one compact record per non-blank input
/// line. Returns the number of records written.
pub fn sanitize_stream<R: BufRead, W: Write>(
    source: R,
    mut destination: W,
) -> Result<usize, SanitizeError> {
    let mut sanitizer = Sanitizer::new();
    let mut written = 0;
    for (index, text) in source.lines().enumerate() {
        let text = text?;
        let Some(record) = sanitizer.sanitize_line(index + 1, &text)? else {
            continue;
        };
        let encoded = serde_json::to_string(&record)
            .map_err(|e| SanitizeError::Io(e.to_string()))?;
        writeln!(destination, "{encoded}")?;
        written += 1;
    }
    destination.flush()?;
    debug!(records = written, tenants = sanitizer.aliases.len(), "Sanitized stream");
    Ok(written)
}
