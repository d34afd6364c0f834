//! Streaming sanitization over JSONL text.

use fixtures_sanitize::{sanitize_stream, SanitizeError};

const INPUT: &str = r#"{"scenario": "fuzz", "tenant": "alpha-corp", "operation": "ingest", "request_count": 256, "budget_bytes": 4096, "overflow_expected": false}

{"scenario": "quota-throughput", "tenant": "beta-labs", "window_seconds": 300, "requests": 3450, "average_latency_ms": 135, "saturation_ratio": 0.85}
{"scenario": "fuzz", "tenant": "alpha-corp", "operation": "prune", "request_count": 0, "budget_bytes": 0, "overflow_expected": true}
"#;

#[test]
fn test_stream_happy_path() {
    let mut out = Vec::new();
    let written = sanitize_stream(INPUT.as_bytes(), &mut out).unwrap();

    assert_eq!(written, 3);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            r#"{"scenario":"fuzz","tenant_alias":"tenant-001","operation":"ingest","request_count":256,"budget_bytes":4096,"overflow_expected":false}"#,
            "\n",
            r#"{"scenario":"quota-throughput","tenant_alias":"tenant-002","window_seconds":300,"requests":3450,"average_latency_ms":135,"saturation_ratio":0.85}"#,
            "\n",
            r#"{"scenario":"fuzz","tenant_alias":"tenant-001","operation":"prune","request_count":0,"budget_bytes":0,"overflow_expected":true}"#,
            "\n",
        )
    );
}

#[test]
fn test_stream_stops_at_first_violation() {
    let input = concat!(
        r#"{"scenario": "fuzz", "tenant": "alpha", "operation": "ingest", "request_count": 1, "budget_bytes": 1, "overflow_expected": false}"#,
        "\n",
        r#"{"scenario": "fuzz", "tenant": ""}"#,
        "\n",
    );
    let mut out = Vec::new();

    let err = sanitize_stream(input.as_bytes(), &mut out).unwrap_err();

    assert_eq!(err, SanitizeError::InvalidTenant { line: 2 });
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}
