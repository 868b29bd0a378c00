//! # HepChat Accuracy Report
//!
//! File: cli/src/evaluation/report.rs
//!
//! ## Overview
//!
//! Writes the per-intent accuracy table consumed by the plotting script:
//!
//! ```csv
//! intent,correct,total,accuracy
//! greeting,5,5,100.00
//! vaccination,3,5,60.00
//! ```
//!
//! One row per expected intent in name order; `accuracy` is a percentage
//! with two decimals.
//!
use super::AccuracyReport;
use crate::common::fs::io::write_string_to_file;
use crate::core::error::Result;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct ReportRow<'a> {
    intent: &'a str,
    correct: usize,
    total: usize,
    accuracy: String,
}

/// Renders `report` as CSV text, header included.
pub fn render_csv(report: &AccuracyReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (intent, counts) in &report.per_intent {
        writer
            .serialize(ReportRow {
                intent: intent.as_str(),
                correct: counts.correct,
                total: counts.total,
                accuracy: format!("{:.2}", counts.accuracy() * 100.0),
            })
            .with_context(|| format!("Failed to serialize report row for '{}'", intent))?;
    }
    if report.per_intent.is_empty() {
        writer
            .write_record(["intent", "correct", "total", "accuracy"])
            .context("Failed to write report header")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush report: {}", e.error()))?;
    String::from_utf8(bytes).context("Report is not valid UTF-8")
}

/// # Write Report (`write_report`)
///
/// Writes the CSV table for `report` to `path`, creating parent directories.
pub fn write_report(report: &AccuracyReport, path: &Path) -> Result<()> {
    let content = render_csv(report)?;
    write_string_to_file(path, &content)?;
    info!(
        "Wrote accuracy report for {} intents to {}",
        report.per_intent.len(),
        path.display()
    );
    Ok(())
}
