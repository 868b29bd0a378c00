//! # HepChat Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand. Each defines a clap `*Args` struct
//! and an async `handle_*` function that receives the parsed arguments and
//! the effective configuration loaded by `main.rs`.
//!
//! ## Command Groups
//!
//! - `ask`: classify one question and print the reply
//! - `eval`: score the classifier against the benchmark
//! - `intents`: validate and list the intent table
//! - `serve`: the HTTP chat endpoint and documentation page
//!

/// One-shot question answering from the terminal.
pub mod ask;
/// Evaluation harness front end.
pub mod eval;
/// Intent table listing.
pub mod intents;
/// HTTP server. Includes configuration, handlers, and server logic.
pub mod serve;
