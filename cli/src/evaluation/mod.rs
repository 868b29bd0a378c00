//! # HepChat Evaluation Harness
//!
//! File: cli/src/evaluation/mod.rs
//!
//! ## Overview
//!
//! Measures how well the classifier labels a benchmark of questions with
//! known intents. Every case is classified once; counts are kept per
//! expected intent so an intent the classifier never predicts still shows
//! up with its misses.
//!
//! ## Architecture
//!
//! - `benchmark`: loading labelled cases from CSV
//! - `report`: writing the per-intent table as CSV
//! - `evaluate` (here): the scoring loop and the `AccuracyReport` it returns
//!
//! Accuracy values are fractions in [0, 1]. Display code multiplies by 100.
//! An empty benchmark yields an accuracy of 0, not an error.
//!
//! ## Examples
//!
//! ```rust
//! let cases = benchmark::load_benchmark(&cfg.data.benchmark)?;
//! let report = evaluation::evaluate(chatbot.classifier(), &cases);
//! println!("{:.2}%", report.accuracy() * 100.0);
//! report::write_report(&report, &cfg.evaluation.report)?;
//! ```
//!
pub mod benchmark;
pub mod report;

use crate::bot::classifier::Classifier;
use crate::bot::intents::UNKNOWN_INTENT;
use benchmark::BenchmarkCase;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Correct and total counts for one expected intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentAccuracy {
    pub correct: usize,
    pub total: usize,
}

impl IntentAccuracy {
    /// `correct / total`, or 0 when there were no cases.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }
}

/// A benchmark case the classifier got wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Misclassification {
    pub question: String,
    pub expected: String,
    pub predicted: String,
    pub confidence: f64,
}

/// Aggregated results of one evaluation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccuracyReport {
    /// Keyed by expected intent, in name order.
    pub per_intent: BTreeMap<String, IntentAccuracy>,
    pub mistakes: Vec<Misclassification>,
}

impl AccuracyReport {
    pub fn correct(&self) -> usize {
        self.per_intent.values().map(|a| a.correct).sum()
    }

    pub fn total(&self) -> usize {
        self.per_intent.values().map(|a| a.total).sum()
    }

    /// Overall fraction of cases classified correctly.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// # Evaluate Classifier (`evaluate`)
///
/// Classifies every case and tallies the results by expected intent.
/// Cases are processed in order, so `mistakes` follows benchmark order.
///
/// Expected intents that the table does not define are counted like any
/// other (they can only ever miss) and reported once with a warning.
pub fn evaluate(classifier: &Classifier, cases: &[BenchmarkCase]) -> AccuracyReport {
    let mut report = AccuracyReport::default();
    let mut undefined = BTreeSet::new();

    for case in cases {
        let expected = case.expected_intent.as_str();
        if expected != UNKNOWN_INTENT && !classifier.table().contains(expected) {
            undefined.insert(expected.to_string());
        }

        let result = classifier.classify(&case.question);
        let counts = report.per_intent.entry(expected.to_string()).or_default();
        counts.total += 1;

        if result.intent == expected {
            counts.correct += 1;
        } else {
            debug!(
                "Miss: {:?} expected {} got {} ({:.2})",
                case.question, expected, result.intent, result.confidence
            );
            report.mistakes.push(Misclassification {
                question: case.question.clone(),
                expected: expected.to_string(),
                predicted: result.intent,
                confidence: result.confidence,
            });
        }
    }

    for name in undefined {
        warn!(
            "Benchmark expects intent '{}', which the intent table does not define",
            name
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::classifier::ScoringWeights;
    use crate::bot::intents::{IntentDefinition, IntentTable};
    use crate::core::error::Result;

    fn classifier() -> Result<Classifier> {
        let greeting = IntentDefinition::new("greeting", ["hello", "hi"], "Hi!")?;
        let vaccination =
            IntentDefinition::new("vaccination", ["vaccine", "booster"], "Vaccines work.")?;
        let table = IntentTable::new(vec![greeting, vaccination], "Please rephrase.")?;
        Ok(Classifier::new(table, ScoringWeights::default()))
    }

    #[test]
    fn tallies_per_expected_intent() -> Result<()> {
        let cases = vec![
            BenchmarkCase::new("hello", "greeting"),
            BenchmarkCase::new("hi", "greeting"),
            BenchmarkCase::new("vaccine", "vaccination"),
            BenchmarkCase::new("qwerty zxcv", "vaccination"),
        ];
        let report = evaluate(&classifier()?, &cases);

        assert_eq!(report.correct(), 3);
        assert_eq!(report.total(), 4);
        assert!((report.accuracy() - 0.75).abs() < 1e-9);

        assert_eq!(
            report.per_intent["greeting"],
            IntentAccuracy {
                correct: 2,
                total: 2
            }
        );
        assert_eq!(report.per_intent["vaccination"].accuracy(), 0.5);

        assert_eq!(report.mistakes.len(), 1);
        let miss = &report.mistakes[0];
        assert_eq!(miss.question, "qwerty zxcv");
        assert_eq!(miss.predicted, UNKNOWN_INTENT);
        assert_eq!(miss.confidence, 0.0);
        Ok(())
    }

    #[test]
    fn overall_equals_sum_of_rows() -> Result<()> {
        let cases = vec![
            BenchmarkCase::new("hello", "greeting"),
            BenchmarkCase::new("booster", "greeting"),
            BenchmarkCase::new("booster", "vaccination"),
            BenchmarkCase::new("nothing here", "unknown"),
            BenchmarkCase::new("hello", "symptoms"),
        ];
        let report = evaluate(&classifier()?, &cases);

        let correct: usize = report.per_intent.values().map(|a| a.correct).sum();
        let total: usize = report.per_intent.values().map(|a| a.total).sum();
        assert_eq!(report.accuracy(), correct as f64 / total as f64);
        assert!((0.0..=1.0).contains(&report.accuracy()));

        // Expected intents are keys even when never predicted.
        assert_eq!(report.per_intent["symptoms"].correct, 0);
        assert_eq!(report.per_intent["unknown"].correct, 1);
        let names: Vec<_> = report.per_intent.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["greeting", "symptoms", "unknown", "vaccination"]);
        Ok(())
    }

    #[test]
    fn empty_benchmark_is_zero_accuracy() -> Result<()> {
        let report = evaluate(&classifier()?, &[]);
        assert_eq!(report.total(), 0);
        assert_eq!(report.accuracy(), 0.0);
        assert!(report.per_intent.is_empty());
        assert!(report.mistakes.is_empty());
        Ok(())
    }
}
