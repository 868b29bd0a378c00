//! # HepChat Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout HepChat. Domain
//! failures get a specific `ChatError` variant; everything is propagated as
//! `anyhow::Error` so callers can attach context on the way up.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ChatError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Intent table errors (duplicates, empty triggers, bad patterns)
//! - Filesystem errors (report directory cannot be created)
//! - Data file errors (missing or unreadable knowledge/benchmark files)
//! - Benchmark row errors
//! - Evaluation gate failures
//!
//! Note that an unmatched question is *not* an error: the classifier answers
//! it with the `unknown` intent. HTTP payload errors live in
//! `commands::serve::handlers::ApiError` because they map to status codes.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if definitions.is_empty() {
//!     return Err(ChatError::IntentTable("the table defines no intents".into()).into());
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read intent table: {}", path.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the HepChat application.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid intent table: {0}")]
    IntentTable(String),

    #[error("Invalid pattern for intent '{intent}': {source}")]
    Pattern {
        intent: String,
        #[source]
        source: regex::Error,
    },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Data file '{}' is unusable: {reason}", .path.display())]
    DataFile { path: PathBuf, reason: String },

    #[error("Benchmark row {row}: {reason}")]
    Benchmark { row: usize, reason: String },

    #[error("Overall accuracy {actual:.2}% is below the required {required:.2}%")]
    AccuracyBelowThreshold { actual: f64, required: f64 },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ChatError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let table_err = ChatError::IntentTable("duplicate intent 'symptoms'".into());
        assert_eq!(
            table_err.to_string(),
            "Invalid intent table: duplicate intent 'symptoms'"
        );

        let fs_err = ChatError::FileSystem("reports is a file".into());
        assert_eq!(fs_err.to_string(), "Filesystem error: reports is a file");

        let data_err = ChatError::DataFile {
            path: PathBuf::from("data/benchmark.csv"),
            reason: "file not found".into(),
        };
        assert_eq!(
            data_err.to_string(),
            "Data file 'data/benchmark.csv' is unusable: file not found"
        );

        let gate = ChatError::AccuracyBelowThreshold {
            actual: 82.0,
            required: 90.0,
        };
        assert_eq!(
            gate.to_string(),
            "Overall accuracy 82.00% is below the required 90.00%"
        );
    }

    #[test]
    fn test_pattern_error_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ChatError::Pattern {
            intent: "testing".into(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern for intent 'testing'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
