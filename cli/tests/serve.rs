//! # HepChat Serve Command Integration Tests
//!
//! File: cli/tests/serve.rs
//!
//! Only start-up failures are covered here; the routes themselves are
//! exercised in-process by the unit tests in `server_logic.rs`.
//!
mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_serve_fails_without_intent_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("hepchat.toml");
    fs::write(&config, "[data]\nintents = \"missing.toml\"\n").expect("write config");

    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["serve", "--port", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("intent table not found"));
}

#[test]
fn test_serve_rejects_invalid_host() {
    let (_dir, config) = setup();
    hepchat_cmd()
        .arg("--config")
        .arg(&config)
        .args(["serve", "--host", "not-an-ip"])
        .assert()
        .failure()
        .code(2);
}
