use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("normalize-transcripts").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("FIXTURES_LOG_LEVEL")
        .env_remove("FIXTURES_LOG_FORMAT");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const RAW: &str = r#"[{"timestamp": "2024-03-01T12:00:00.0004Z", "direction": "RECEIVE", "envelope": {"z": 1, "a": 2}}]"#;

const NORMALIZED: &str = r#"[
  {
    "direction": "receive",
    "timestamp": "2024-03-01T12:00:00.000Z",
    "envelope": {
      "a": 2,
      "z": 1
    }
  }
]
"#;

#[test]
fn prints_normalized_transcript() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "session.json", RAW);

    cmd().arg(&path).assert().success().stdout(NORMALIZED);
    assert_eq!(fs::read_to_string(&path).unwrap(), RAW);
}

#[test]
fn rewrites_in_place() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "a.json", RAW);
    let b = write(tmp.path(), "b.json", NORMALIZED);

    cmd().arg("--in-place").arg(&a).arg(&b).assert().success().stdout("");
    assert_eq!(fs::read_to_string(&a).unwrap(), NORMALIZED);
    assert_eq!(fs::read_to_string(&b).unwrap(), NORMALIZED);
}

#[test]
fn writes_to_output_path() {
    let tmp = TempDir::new().unwrap();
    let input = write(tmp.path(), "raw.json", RAW);
    let output = tmp.path().join("out.json");

    cmd().arg(&input).arg("--output").arg(&output).assert().success();
    assert_eq!(fs::read_to_string(&output).unwrap(), NORMALIZED);
}

#[test]
fn check_reports_drift_without_writing() {
    let tmp = TempDir::new().unwrap();
    let clean = write(tmp.path(), "clean.json", NORMALIZED);
    let dirty = write(tmp.path(), "dirty.json", RAW);

    cmd().arg("--check").arg(&clean).assert().code(0);
    cmd()
        .arg("--check")
        .arg(&clean)
        .arg(&dirty)
        .assert()
        .code(1)
        .stderr(contains("dirty.json"));
    assert_eq!(fs::read_to_string(&dirty).unwrap(), RAW);
}

#[test]
fn multiple_paths_need_a_destination() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "a.json", RAW);
    let b = write(tmp.path(), "b.json", RAW);

    cmd()
        .arg(&a)
        .arg(&b)
        .assert()
        .code(1)
        .stderr(contains("--in-place or --output"));
    cmd()
        .arg(&a)
        .arg(&b)
        .arg("--output")
        .arg(tmp.path().join("out.json"))
        .assert()
        .code(1)
        .stderr(contains("single input path"));
}

#[test]
fn invalid_record_names_file_and_index() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "bad.json",
        r#"[{"direction": "sideways", "timestamp": "2024-03-01", "envelope": {}}]"#,
    );

    cmd()
        .arg(&path)
        .assert()
        .code(1)
        .stderr(contains("bad.json").and(contains("record 0 direction")));
}
