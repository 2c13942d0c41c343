//! Smoke tests for the `luna` binary, following the teacher's
//! `assert_cmd`-driven CLI test style.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn info_on_a_fresh_data_dir_reports_defaults() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("luna")
        .unwrap()
        .args(["--data-dir", dir.path().to_str().unwrap(), "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("age:"))
        .stdout(predicate::str::contains("generation:"));
}

#[test]
fn info_json_format_is_valid_json() {
    let dir = TempDir::new().unwrap();

    let output = Command::cargo_bin("luna")
        .unwrap()
        .args(["--data-dir", dir.path().to_str().unwrap(), "--format", "json", "info"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed.get("total_files").is_some());
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    Command::cargo_bin("luna").unwrap().assert().failure();
}
