//! Record and timestamp normalization.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::TranscriptError;

/// Directions a record may carry after lowercasing.
pub const DIRECTIONS: &[&str] = &["send", "receive"];

const REQUIRED_FIELDS: [&str; 3] = ["direction", "timestamp", "envelope"];

/// A normalized exchange record.
///
/// Serializes as `direction`, `timestamp`, `envelope`, then any remaining
/// keys in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub direction: String,
    pub timestamp: String,
    pub envelope: Value,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize every record of a parsed transcript.
pub fn normalize_transcript(records: &Value) -> Result<Vec<NormalizedRecord>, TranscriptError> {
    let Some(records) = records.as_array() else {
        return Err(TranscriptError::NotAnArray(json_type(records)));
    };
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

/// Normalize a single record at `index`.
pub fn normalize_record(index: usize, record: &Value) -> Result<NormalizedRecord, TranscriptError> {
    let Some(fields) = record.as_object() else {
        return Err(TranscriptError::RecordNotObject {
            index,
            found: json_type(record),
        });
    };
    let field = |name: &'static str| {
        fields
            .get(name)
            .ok_or(TranscriptError::MissingField { index, field: name })
    };

    let direction_raw = field("direction")?;
    let direction = match direction_raw {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string(),
    };
    if !DIRECTIONS.contains(&direction.as_str()) {
        return Err(TranscriptError::InvalidDirection {
            index,
            found: direction_raw.to_string(),
        });
    }

    let timestamp_raw = field("timestamp")?;
    let timestamp = timestamp_raw
        .as_str()
        .and_then(normalize_timestamp)
        .ok_or_else(|| TranscriptError::InvalidTimestamp {
            index,
            found: timestamp_raw.to_string(),
        })?;

    let envelope = sort_json_value(field("envelope")?.clone());

    let extra = fields
        .iter()
        .filter(|(key, _)| !REQUIRED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), sort_json_value(value.clone())))
        .collect();

    Ok(NormalizedRecord {
        direction,
        timestamp,
        envelope,
        extra,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    // Naive values are UTC.
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Round to the nearest millisecond, ties to even on the microsecond value.
fn round_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    let micros = at.timestamp_subsec_micros().min(999_999);
    let mut millis = micros / 1000;
    let remainder = micros % 1000;
    if remainder > 500 || (remainder == 500 && millis % 2 == 1) {
        millis += 1;
    }
    let whole_second = at - TimeDelta::nanoseconds(i64::from(at.timestamp_subsec_nanos()));
    whole_second + TimeDelta::milliseconds(i64::from(millis))
}

/// Normalize an ISO-8601 timestamp to UTC with millisecond precision, e.g.
/// `2024-03-01T12:00:00.124Z`. Returns `None` if it cannot be parsed.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let parsed = parse_timestamp(raw)?;
    Some(
        round_to_millis(parsed)
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    )
}

/// Recursively sort object keys.
///
/// `serde_json::Map` keeps insertion order once `preserve_order` is enabled
/// anywhere in the build (`fixtures-sbom` enables it), so the order is fixed
/// here rather than left to the map type.
pub fn sort_json_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sort_json_value).collect()),
        Value::Object(fields) => {
            let sorted: BTreeMap<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (key, sort_json_value(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("2024-03-01T12:00:00Z", "2024-03-01T12:00:00.000Z")]
    #[case("2024-03-01T12:00:00.123456Z", "2024-03-01T12:00:00.123Z")]
    #[case("2024-03-01T12:00:00.123500Z", "2024-03-01T12:00:00.124Z")]
    #[case("2024-03-01T12:00:00.124500Z", "2024-03-01T12:00:00.124Z")]
    #[case("2024-03-01T12:00:00.124501Z", "2024-03-01T12:00:00.125Z")]
    #[case("2024-03-01T23:59:59.999900Z", "2024-03-02T00:00:00.000Z")]
    #[case("2024-03-01T14:30:00+02:00", "2024-03-01T12:30:00.000Z")]
    #[case("2024-03-01T12:00:00", "2024-03-01T12:00:00.000Z")]
    #[case("2024-03-01 12:00:00.5", "2024-03-01T12:00:00.500Z")]
    #[case("2024-03-01", "2024-03-01T00:00:00.000Z")]
    fn test_normalize_timestamp(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_timestamp(raw).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2024-13-01T00:00:00Z")]
    #[case("")]
    fn test_invalid_timestamp(#[case] raw: &str) {
        assert_eq!(normalize_timestamp(raw), None);
    }

    #[test]
    fn test_sort_json_value_is_recursive() {
        let value = json!({"b": {"z": 1, "a": [{"y": 2, "x": 3}]}, "a": null});
        let sorted = sort_json_value(value);
        assert_eq!(
            serde_json::to_string(&sorted).unwrap(),
            r#"{"a":null,"b":{"a":[{"x":3,"y":2}],"z":1}}"#
        );
    }

    #[test]
    fn test_record_fields_are_normalized_and_ordered() {
        let record = json!({
            "session": {"id": "s-1", "client": "vim"},
            "envelope": {"method": "initialize", "id": 1, "jsonrpc": "2.0"},
            "timestamp": "2024-03-01T12:00:00.000400Z",
            "direction": "SEND",
            "client": "vim"
        });

        let normalized = normalize_record(0, &record).unwrap();
        assert_eq!(normalized.direction, "send");
        assert_eq!(normalized.timestamp, "2024-03-01T12:00:00.000Z");
        assert_eq!(
            serde_json::to_string(&normalized).unwrap(),
            concat!(
                r#"{"direction":"send","timestamp":"2024-03-01T12:00:00.000Z","#,
                r#""envelope":{"id":1,"jsonrpc":"2.0","method":"initialize"},"#,
                r#""client":"vim","session":{"client":"vim","id":"s-1"}}"#
            )
        );
    }

    #[test]
    fn test_record_errors() {
        assert_eq!(
            normalize_transcript(&json!({"records": []})),
            Err(TranscriptError::NotAnArray("object"))
        );
        assert_eq!(
            normalize_transcript(&json!([42])),
            Err(TranscriptError::RecordNotObject {
                index: 0,
                found: "number"
            })
        );
        assert_eq!(
            normalize_record(3, &json!({"direction": "send", "envelope": {}})),
            Err(TranscriptError::MissingField {
                index: 3,
                field: "timestamp"
            })
        );
        assert!(matches!(
            normalize_record(
                1,
                &json!({"direction": "sideways", "timestamp": "2024-03-01", "envelope": {}})
            ),
            Err(TranscriptError::InvalidDirection { index: 1, .. })
        ));
        assert!(matches!(
            normalize_record(
                0,
                &json!({"direction": "receive", "timestamp": 1700000000, "envelope": {}})
            ),
            Err(TranscriptError::InvalidTimestamp { index: 0, .. })
        ));
    }
}
