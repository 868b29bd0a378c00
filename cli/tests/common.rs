//! # HepChat CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `hepchat` binary against an explicit config file written to
//! a temporary directory, so results never depend on a user or project
//! config on the machine running the tests.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A `Command` for the compiled `hepchat` binary with config-related
/// environment variables cleared.
pub fn hepchat_cmd() -> Command {
    let mut cmd = Command::cargo_bin("hepchat").expect("Failed to find hepchat binary for testing");
    cmd.env_remove("HEPCHAT_CONFIG")
        .env_remove("HEPCHAT_PORT")
        .env_remove("HEPCHAT_HOST")
        .env_remove("RUST_LOG");
    cmd
}

/// Path of a file under `cli/data/`.
pub fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

/// Writes `hepchat.toml` into `dir` using the bundled data files, with the
/// report going to `dir/reports/`. `extra` is appended verbatim.
pub fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let config = format!(
        "[data]\nintents = {:?}\nknowledge = {:?}\nbenchmark = {:?}\n\n[evaluation]\nreport = {:?}\n{}",
        data_file("intents.toml"),
        data_file("knowledge.csv"),
        data_file("benchmark.csv"),
        dir.join("reports").join("intent_accuracy.csv"),
        extra
    );
    let path = dir.join("hepchat.toml");
    fs::write(&path, config).expect("write test config");
    path
}

/// A temporary directory with a default test config in it.
pub fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");
    (dir, config)
}
