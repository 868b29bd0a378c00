//! # HepChat Benchmark Cases
//!
//! File: cli/src/evaluation/benchmark.rs
//!
//! ## Overview
//!
//! Loads the labelled questions the harness scores the classifier against.
//! The file is CSV with a header row:
//!
//! ```csv
//! question,expected_intent
//! how does hepatitis b spread from person to person,transmission
//! ```
//!
//! Fields are trimmed. A row with an empty question or intent is rejected
//! with its line number, so a broken benchmark fails loudly instead of
//! quietly lowering the score.
//!
use crate::common::fs::io::read_file_to_string;
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// One labelled question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCase {
    pub question: String,
    pub expected_intent: String,
}

impl BenchmarkCase {
    pub fn new(question: impl Into<String>, expected_intent: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            expected_intent: expected_intent.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCase {
    question: Option<String>,
    expected_intent: Option<String>,
}

/// # Load Benchmark (`load_benchmark`)
///
/// Reads every case from the CSV file at `path`, in file order.
///
/// ## Errors
///
/// Fails if the file is missing, is not valid CSV with the expected header,
/// or contains a row with an empty field.
pub fn load_benchmark(path: &Path) -> Result<Vec<BenchmarkCase>> {
    if !path.is_file() {
        return Err(anyhow!(ChatError::DataFile {
            path: path.to_path_buf(),
            reason: "benchmark not found".into(),
        }));
    }
    let content = read_file_to_string(path)?;
    let cases = parse_benchmark(&content)
        .with_context(|| format!("Failed to load benchmark from {}", path.display()))?;
    info!("Loaded {} benchmark cases from {}", cases.len(), path.display());
    Ok(cases)
}

/// Parses benchmark CSV text with a header line.
pub fn parse_benchmark(content: &str) -> Result<Vec<BenchmarkCase>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut cases = Vec::new();
    for (index, row) in reader.deserialize::<RawCase>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let raw = row.with_context(|| format!("Malformed benchmark row {}", line))?;

        let question = raw.question.unwrap_or_default();
        let expected_intent = raw.expected_intent.unwrap_or_default();
        if question.is_empty() {
            return Err(anyhow!(ChatError::Benchmark {
                row: line,
                reason: "question is empty".into(),
            }));
        }
        if expected_intent.is_empty() {
            return Err(anyhow!(ChatError::Benchmark {
                row: line,
                reason: "expected_intent is empty".into(),
            }));
        }
        cases.push(BenchmarkCase::new(question, expected_intent));
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_cases_in_order() -> Result<()> {
        let cases = parse_benchmark(
            "question,expected_intent\n\
             \"hi, I need some help\", greeting \n\
             what is the window period,window\n",
        )?;
        assert_eq!(
            cases,
            vec![
                BenchmarkCase::new("hi, I need some help", "greeting"),
                BenchmarkCase::new("what is the window period", "window"),
            ]
        );
        Ok(())
    }

    #[test]
    fn header_only_is_empty_benchmark() -> Result<()> {
        assert!(parse_benchmark("question,expected_intent\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn blank_field_names_the_row() {
        let err =
            parse_benchmark("question,expected_intent\nok,greeting\n  ,testing\n").unwrap_err();
        let chat_err = err.downcast_ref::<ChatError>().expect("ChatError");
        assert!(matches!(chat_err, ChatError::Benchmark { row: 3, .. }));

        let err = parse_benchmark("question,expected_intent\nlonely question,\n").unwrap_err();
        assert!(err.to_string().contains("expected_intent is empty"));
    }

    #[test]
    fn wrong_column_count_is_an_error() {
        assert!(parse_benchmark("question,expected_intent\na,b,c\n").is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = load_benchmark(Path::new("/no/such/benchmark.csv")).unwrap_err();
        assert!(err.to_string().contains("benchmark not found"));
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("benchmark.csv");
        fs::write(&path, "question,expected_intent\nhello there,greeting\n")?;
        let cases = load_benchmark(&path)?;
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].expected_intent, "greeting");
        Ok(())
    }
}
