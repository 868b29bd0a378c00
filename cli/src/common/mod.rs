//! # HepChat Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to the chatbot or to any one
//! command. Currently only filesystem I/O.
//!

/// Utilities for filesystem operations.
pub mod fs;
