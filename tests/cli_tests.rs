#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

fn write_csv(contents: &str) -> NamedTempFile {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), contents).expect("write csv");
    tmp
}

#[test]
fn analyze_prints_table_and_summary() {
    let input = write_csv("Activity,Duration (Days),Dependencies\nX,2,\nY,3,X\nZ,1,X\n");
    cli()
        .args(["analyze", "--start", "2025-03-03"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(str_contains("| Activity |"))
        .stdout(str_contains("Non-Critical"))
        .stdout(str_contains("2025-03-07"))
        .stdout(str_contains("crit_path=X->Y"));
}

#[test]
fn analyze_writes_csv_output() {
    let input = write_csv("Activity,Duration (Days),Dependencies\nX,2,\nY,3,X\nZ,1,X\n");
    let output = NamedTempFile::new().expect("create temp file");
    cli()
        .args(["analyze", "--start", "2025-03-03", "--format", "csv", "--output"])
        .arg(output.path())
        .arg(input.path())
        .assert()
        .success();

    let text = fs::read_to_string(output.path()).unwrap();
    assert!(text.starts_with("Activity,Duration (Days),Dependencies,ES,EF,LS,LF,Slack (Days),Status"));
    assert!(text.contains("Z,1,X,2025-03-05,2025-03-05,2025-03-07,2025-03-07,2,Non-Critical"));
}

#[test]
fn analyze_emits_json() {
    let input = write_csv("Activity,Duration (Days),Dependencies\nX,2,\n");
    let assert = cli()
        .args(["analyze", "--start", "2025-03-03", "--format", "json"])
        .arg(input.path())
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["critical_path"], serde_json::json!(["X"]));
    assert_eq!(value["project_finish"], "2025-03-04");
}

#[test]
fn analyze_reports_cycles_with_error_kind() {
    let input = write_csv("Activity,Duration (Days),Dependencies\nA,1,B\nB,1,A\n");
    cli()
        .args(["analyze", "--start", "2025-03-03"])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(str_contains("error[cycle_detected]"));
}

#[test]
fn analyze_reports_missing_columns() {
    let input = write_csv("Activity,Duration\nA,1\n");
    cli()
        .arg("analyze")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(str_contains("missing required column(s): Duration (Days), Dependencies"));
}

#[test]
fn template_prints_sample_project() {
    cli()
        .arg("template")
        .assert()
        .success()
        .stdout(str_contains("Activity,Duration (Days),Dependencies"))
        .stdout(str_contains("F,5,\"D, E\""));
}
