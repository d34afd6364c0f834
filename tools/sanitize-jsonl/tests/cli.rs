use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("sanitize-jsonl").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("FIXTURES_LOG_LEVEL")
        .env_remove("FIXTURES_LOG_FORMAT");
    cmd
}

const RAW: &str = concat!(
    r#"{"scenario": "quota-throughput", "tenant": "beta-labs", "window_seconds": 60, "requests": 10, "average_latency_ms": 4, "saturation_ratio": 0.5}"#,
    "\n",
    r#"{"scenario": "fuzz", "tenant": "alpha-corp", "operation": "audit", "request_count": 2, "budget_bytes": 64, "overflow_expected": true}"#,
    "\n",
);

const SANITIZED: &str = concat!(
    r#"{"scenario":"quota-throughput","tenant_alias":"tenant-001","window_seconds":60,"requests":10,"average_latency_ms":4,"saturation_ratio":0.5}"#,
    "\n",
    r#"{"scenario":"fuzz","tenant_alias":"tenant-002","operation":"audit","request_count":2,"budget_bytes":64,"overflow_expected":true}"#,
    "\n",
);

#[test]
fn stdin_to_stdout() {
    cmd().write_stdin(RAW).assert().success().stdout(SANITIZED);
}

#[test]
fn file_to_file() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("archive.jsonl");
    let output = tmp.path().join("sanitized.jsonl");
    fs::write(&input, RAW).unwrap();

    cmd()
        .arg("--input")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(&output).unwrap(), SANITIZED);
}

#[test]
fn schema_violation_exits_one() {
    cmd()
        .write_stdin(r#"{"scenario": "fuzz", "tenant": "alpha", "operation": "invalid", "request_count": 1, "budget_bytes": 1, "overflow_expected": false}"#)
        .assert()
        .code(1)
        .stderr(contains("line 1: unsupported operation 'invalid'"));
}

#[test]
fn missing_input_exits_one() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .arg("-i")
        .arg(tmp.path().join("absent.jsonl"))
        .assert()
        .code(1)
        .stderr(contains("failed to open"));
}
