//! Smoke tests for the tempo binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp config");
    write!(file, "{content}").expect("Failed to write temp config");
    file
}

#[test]
fn test_validate_accepts_a_good_config() {
    let config = write_config(
        "jobs:\n  - name: tick\n    command: \"echo tick\"\n    interval-ms: 10\n",
    );

    Command::cargo_bin("tempo")
        .unwrap()
        .arg("validate")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 jobs"));
}

#[test]
fn test_validate_rejects_a_broken_config() {
    let config = write_config("jobs:\n  - name: broken\n    command: \"\"\n    interval-ms: 10\n");

    Command::cargo_bin("tempo")
        .unwrap()
        .arg("validate")
        .arg(config.path())
        .assert()
        .failure();
}

#[test]
fn test_run_executes_a_one_shot_job() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let config = write_config(&format!(
        "scheduler:\n  poll_interval_ms: 5\njobs:\n  - name: touch\n    command: \"touch {}\"\n    interval-ms: 10\n",
        marker.display()
    ));

    Command::cargo_bin("tempo")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("all jobs completed"));

    assert!(marker.exists(), "job command never ran");
}

#[test]
fn test_run_propagates_job_failure_as_exit_code() {
    let config = write_config(
        "scheduler:\n  poll_interval_ms: 5\njobs:\n  - name: doomed\n    command: \"false\"\n    interval-ms: 10\n",
    );

    Command::cargo_bin("tempo")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("a job reported failure"));
}

#[test]
fn test_repeating_job_honors_max_runs() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("runs.log");
    let config = write_config(&format!(
        "scheduler:\n  poll_interval_ms: 5\njobs:\n  - name: thrice\n    command: \"echo run >> {}\"\n    interval-ms: 10\n    repeat: true\n    max-runs: 3\n",
        log.display()
    ));

    Command::cargo_bin("tempo")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("run")
        .assert()
        .success();

    let runs = std::fs::read_to_string(&log).unwrap();
    assert_eq!(runs.lines().count(), 3);
}
