//! Integration tests for the onyx-job CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn onyx_cmd() -> Command {
    Command::cargo_bin("onyx-job").unwrap()
}

const VALID_JOB: &str = r#"
task-scheduler: balanced
workflow:
  - [in, process]
  - [process, out]
catalog:
  - { name: in, type: input, plugin: ":onyx.plugin.core-async/input", batch-size: 10 }
  - { name: process, type: function, fn: ":my.app/process" }
  - { name: out, type: output, plugin: ":onyx.plugin.core-async/output" }
"#;

fn write_job(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_flag() {
    onyx_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("validate"));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_edn() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(&temp_dir, "job.yaml", VALID_JOB);

    onyx_cmd()
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "{:task-scheduler :onyx.task-scheduler/balanced",
        ))
        .stdout(predicate::str::contains(
            ":workflow [[:in :process] [:process :out]]",
        ))
        .stdout(predicate::str::contains(":onyx/batch-size 10"));
}

#[test]
fn test_render_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(&temp_dir, "job.yaml", VALID_JOB);

    onyx_cmd()
        .args(["render", "--format", "json"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"task-scheduler\": \"onyx.task-scheduler/balanced\"",
        ))
        .stdout(predicate::str::contains("\"onyx/fn\": \"my.app/process\""));
}

#[test]
fn test_render_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(&temp_dir, "job.yaml", VALID_JOB);

    onyx_cmd()
        .args(["render", "-f", "yaml"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("onyx/name: in"));
}

#[test]
fn test_render_missing_file() {
    onyx_cmd()
        .args(["render", "/nonexistent/job.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_render_missing_field() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(&temp_dir, "bad.yaml", "catalog:\n  - { name: in }\n");

    onyx_cmd()
        .arg("render")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "catalog entry #0 is missing required field 'type'",
        ));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_valid_job() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(&temp_dir, "job.yaml", VALID_JOB);

    onyx_cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 tasks, 2 edges"))
        .stdout(predicate::str::contains("Valid"));
}

#[test]
fn test_validate_warning_only() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(
        &temp_dir,
        "job.yaml",
        &format!("{}  - {{ name: audit, type: output }}\n", VALID_JOB),
    );

    onyx_cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("'audit' does not appear in the workflow"))
        .stdout(predicate::str::contains("1 warning"));
}

#[test]
fn test_validate_unknown_task() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(
        &temp_dir,
        "job.yaml",
        r#"
workflow:
  - [in, sink]
catalog:
  - { name: in, type: input }
  - { name: out, type: output }
"#,
    );

    onyx_cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("'sink' which is not in the catalog"))
        .stdout(predicate::str::contains("Available tasks: in, out"))
        .stderr(predicate::str::contains("error(s)"));
}

#[test]
fn test_validate_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_job(
        &temp_dir,
        "job.yaml",
        r#"
workflow:
  - [in, process]
  - [process, out]
  - [out, in]
catalog:
  - { name: in, type: input }
  - { name: process, type: function }
  - { name: out, type: output }
"#,
    );

    onyx_cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cycle detected: in → process → out → in"));
}
