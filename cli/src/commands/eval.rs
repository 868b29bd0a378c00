//! # HepChat Eval Command
//!
//! File: cli/src/commands/eval.rs
//!
//! ## Overview
//!
//! Runs the evaluation harness: loads the benchmark, classifies every
//! question, prints overall and per-intent accuracy plus the misses, and
//! writes the per-intent CSV report.
//!
//! With `--min-accuracy` (or `evaluation.min_accuracy` in the config) the
//! command exits with an error when overall accuracy falls below the bar,
//! which makes threshold tuning safe to gate in CI.
//!
//! ```bash
//! hepchat eval
//! hepchat eval --benchmark my_cases.csv --output /tmp/acc.csv
//! hepchat eval --min-accuracy 0.9 --no-report
//! ```
//!
use crate::bot::chatbot::Chatbot;
use crate::core::config::Config;
use crate::core::error::{ChatError, Result};
use crate::evaluation::{self, benchmark, report, AccuracyReport};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Benchmark CSV to score against. Defaults to `data.benchmark`.
    #[arg(long, short)]
    pub benchmark: Option<PathBuf>,

    /// Where to write the per-intent CSV report. Defaults to `evaluation.report`.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Fail when overall accuracy (a fraction, e.g. 0.9) is below this.
    #[arg(long, value_parser = parse_fraction)]
    pub min_accuracy: Option<f64>,

    /// Print results without writing the CSV report.
    #[arg(long)]
    pub no_report: bool,
}

fn parse_fraction(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0.0..=1.0", value))
    }
}

/// # Handle Eval Command (`handle_eval`)
///
/// ## Errors
///
/// Fails if the data files or the benchmark cannot be loaded, if the report
/// cannot be written, or if accuracy is below the configured minimum.
pub async fn handle_eval(args: EvalArgs, config: &Config) -> Result<()> {
    let benchmark_path = args
        .benchmark
        .unwrap_or_else(|| config.data.benchmark.clone());
    let report_path = args
        .output
        .unwrap_or_else(|| config.evaluation.report.clone());
    let min_accuracy = args.min_accuracy.or(config.evaluation.min_accuracy);

    let chatbot = Chatbot::from_data(&config.data, config.classifier.weights())?;
    let cases = benchmark::load_benchmark(&benchmark_path)?;
    let results = evaluation::evaluate(chatbot.classifier(), &cases);
    info!(
        "Evaluated {} cases: {}/{} correct",
        cases.len(),
        results.correct(),
        results.total()
    );

    print_summary(&results);

    if !args.no_report {
        report::write_report(&results, &report_path)?;
        println!("Report written to {}", report_path.display());
    }

    if let Some(required) = min_accuracy {
        if results.accuracy() < required {
            anyhow::bail!(ChatError::AccuracyBelowThreshold {
                actual: results.accuracy() * 100.0,
                required: required * 100.0,
            });
        }
    }
    Ok(())
}

fn print_summary(results: &AccuracyReport) {
    println!(
        "\nOverall accuracy: {:.2}%  ({}/{})\n",
        results.accuracy() * 100.0,
        results.correct(),
        results.total()
    );

    if results.per_intent.is_empty() {
        println!("The benchmark has no cases.\n");
        return;
    }

    let name_width = results
        .per_intent
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(12)
        .clamp(12, 30);
    println!(
        "{:<width$} | Correct | Total | Accuracy",
        "Intent",
        width = name_width
    );
    println!("{:-<width$}-+---------+-------+---------", "", width = name_width);
    for (intent, counts) in &results.per_intent {
        println!(
            "{:<width$} | {:>7} | {:>5} | {:>7.1}%",
            intent,
            counts.correct,
            counts.total,
            counts.accuracy() * 100.0,
            width = name_width
        );
    }
    println!();

    if results.mistakes.is_empty() {
        println!("No misclassifications.\n");
        return;
    }
    println!("Misclassifications:");
    for miss in &results.mistakes {
        println!("  Q: {:?}", miss.question);
        println!(
            "     expected = {}, predicted = {}, confidence = {:.2}\n",
            miss.expected, miss.predicted, miss.confidence
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_accuracy_must_be_a_fraction() {
        assert_eq!(parse_fraction("0.9"), Ok(0.9));
        assert_eq!(parse_fraction("1"), Ok(1.0));
        assert!(parse_fraction("90").is_err());
        assert!(parse_fraction("-0.1").is_err());
        assert!(parse_fraction("high").is_err());
    }

    #[test]
    fn parses_flags() {
        let args = EvalArgs::try_parse_from([
            "eval",
            "-b",
            "cases.csv",
            "--min-accuracy",
            "0.5",
            "--no-report",
        ])
        .expect("valid args");
        assert_eq!(args.benchmark, Some(PathBuf::from("cases.csv")));
        assert_eq!(args.min_accuracy, Some(0.5));
        assert!(args.no_report);
        assert!(args.output.is_none());
    }
}
