//! # HepChat Eval Command Integration Tests
//!
//! File: cli/tests/eval.rs
//!
//! ## Overview
//!
//! Runs `hepchat eval` against the bundled benchmark and small hand-written
//! ones. Assertions on the bundled data stay structural, so tuning the
//! intent table does not break them.
//!
mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn write_benchmark(dir: &Path, rows: &str) -> PathBuf {
    let path = dir.join("cases.csv");
    fs::write(&path, format!("question,expected_intent\n{}", rows)).expect("write benchmark");
    path
}

#[test]
fn test_eval_writes_report() {
    let (dir, config) = setup();
    let report = dir.path().join("reports").join("intent_accuracy.csv");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .arg("eval")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall accuracy:"))
        .stdout(predicate::str::contains("/55)"))
        .stdout(predicate::str::contains("Report written to"));

    let content = fs::read_to_string(&report).expect("report written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "intent,correct,total,accuracy");
    assert_eq!(lines.len(), 12, "header plus one row per benchmark intent");
    assert!(lines.iter().any(|l| l.starts_with("transmission,")));
    assert!(lines.iter().any(|l| l.starts_with("lab_markers,")));
    assert!(lines.iter().any(|l| l.starts_with("unknown,")));
}

#[test]
fn test_eval_output_flag_overrides_config() {
    let (dir, config) = setup();
    let output = dir.path().join("custom").join("acc.csv");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--output"])
        .arg(&output)
        .assert()
        .success();

    assert!(output.is_file());
    assert!(!dir.path().join("reports").exists());
}

#[test]
fn test_eval_exact_triggers_score_perfectly() {
    let (dir, config) = setup();
    let benchmark = write_benchmark(
        dir.path(),
        "hello,greeting\nWhat is Hepatitis B?,definition\nvaccine,vaccination\nwindow period,window\n",
    );

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--no-report", "--min-accuracy", "1.0", "--benchmark"])
        .arg(&benchmark)
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall accuracy: 100.00%  (4/4)"))
        .stdout(predicate::str::contains("No misclassifications."));
}

#[test]
fn test_eval_fails_below_min_accuracy() {
    let (dir, config) = setup();
    let benchmark = write_benchmark(
        dir.path(),
        "vaccine,vaccination\nasdkjasd nonsense query,treatment\n",
    );

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--min-accuracy", "1.0", "--benchmark"])
        .arg(&benchmark)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Overall accuracy: 50.00%  (1/2)"))
        .stdout(predicate::str::contains("asdkjasd nonsense query"))
        .stderr(predicate::str::contains("below the required 100.00%"));

    // The report is still written before the gate is checked.
    assert!(dir
        .path()
        .join("reports")
        .join("intent_accuracy.csv")
        .is_file());
}

#[test]
fn test_eval_min_accuracy_from_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "min_accuracy = 1.0\n");
    let benchmark = write_benchmark(dir.path(), "asdkjasd nonsense query,treatment\n");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--no-report", "--benchmark"])
        .arg(&benchmark)
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the required"));
}

#[test]
fn test_eval_empty_benchmark() {
    let (dir, config) = setup();
    let benchmark = write_benchmark(dir.path(), "");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--benchmark"])
        .arg(&benchmark)
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00%  (0/0)"))
        .stdout(predicate::str::contains("The benchmark has no cases."));

    let content = fs::read_to_string(dir.path().join("reports").join("intent_accuracy.csv"))
        .expect("report written");
    assert_eq!(content.trim(), "intent,correct,total,accuracy");
}

#[test]
fn test_eval_rejects_blank_row() {
    let (dir, config) = setup();
    let benchmark = write_benchmark(dir.path(), "hello,greeting\n ,testing\n");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--benchmark"])
        .arg(&benchmark)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Benchmark row 3"));
}

#[test]
fn test_eval_missing_benchmark() {
    let (dir, config) = setup();
    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--benchmark"])
        .arg(dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("benchmark not found"));
}

#[test]
fn test_eval_no_report_writes_nothing() {
    let (dir, config) = setup();
    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--no-report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written").not());

    assert!(!dir.path().join("reports").exists());
}

#[test]
fn test_eval_rejects_out_of_range_min_accuracy() {
    let (_dir, config) = setup();
    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["eval", "--min-accuracy", "95"])
        .assert()
        .failure()
        .code(2);
}
