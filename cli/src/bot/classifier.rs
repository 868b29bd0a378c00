//! # HepChat Intent Classifier
//!
//! File: cli/src/bot/classifier.rs
//!
//! ## Overview
//!
//! Maps a free-text question to one intent of the table, or to `unknown`.
//! Classification is a pure function of the input and the table: no
//! randomness, no state, no I/O, and it never fails.
//!
//! ## Scoring
//!
//! The input is normalized (see `text::normalize`). If it is empty the result
//! is `unknown`. If it equals one of an intent's trigger phrases, that intent
//! wins outright with confidence 1.0. Otherwise every intent is scored:
//!
//! ```text
//! score = phrase  * (trigger phrases contained as whole words)
//!       + pattern * (regex patterns matching the normalized input)
//!       + keyword * (input tokens found in the intent's keyword set)
//!       + example * (largest token overlap with any example question)
//! ```
//!
//! The highest score wins, and ties go to the intent defined first. A best
//! score of zero, or one below `min_score`, resolves to `unknown` with the
//! table's fallback response. Confidence is `min(1, score / confidence_scale)`.
//!
use super::intents::{IntentDefinition, IntentTable, UNKNOWN_INTENT};
use super::text;
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// Tunable parameters of the scoring function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub phrase: f64,
    pub pattern: f64,
    pub keyword: f64,
    pub example: f64,
    pub min_score: f64,
    pub confidence_scale: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            phrase: 2.0,
            pattern: 2.0,
            keyword: 1.0,
            example: 0.8,
            min_score: 2.5,
            confidence_scale: 8.0,
        }
    }
}

/// The outcome of classifying one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// A table intent name, or `unknown`.
    pub intent: String,
    /// Raw score of the winning intent (best score seen, for `unknown`).
    pub score: f64,
    /// Score mapped into [0, 1]; always 0 for `unknown`.
    pub confidence: f64,
    /// Canonical response of the intent, or the fallback response.
    pub response: String,
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.intent == UNKNOWN_INTENT
    }
}

/// Score of one intent for one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentScore {
    pub intent: String,
    pub score: f64,
}

/// Rule-based classifier over a read-only intent table.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: IntentTable,
    weights: ScoringWeights,
}

impl Classifier {
    pub fn new(table: IntentTable, weights: ScoringWeights) -> Self {
        Self { table, weights }
    }

    pub fn table(&self) -> &IntentTable {
        &self.table
    }

    /// Classifies `input`. See the module docs for the policy.
    pub fn classify(&self, input: &str) -> Classification {
        let normalized = text::normalize(input);
        if normalized.is_empty() {
            return self.unknown(0.0);
        }
        let tokens = text::token_set(&normalized);

        if let Some(intent) = self
            .table
            .intents()
            .iter()
            .find(|intent| intent.triggers().iter().any(|t| *t == normalized))
        {
            let score = self.score(intent, &normalized, &tokens);
            trace!("Exact trigger match for '{}'", intent.name());
            return self.matched(intent, score, 1.0);
        }

        let mut best: Option<(&IntentDefinition, f64)> = None;
        for intent in self.table.intents() {
            let score = self.score(intent, &normalized, &tokens);
            trace!("Intent '{}' scored {:.2}", intent.name(), score);
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if better {
                best = Some((intent, score));
            }
        }

        match best {
            Some((intent, score)) if score > 0.0 && score >= self.weights.min_score => {
                let confidence = (score / self.weights.confidence_scale).min(1.0);
                self.matched(intent, score, confidence)
            }
            Some((_, score)) => self.unknown(score),
            None => self.unknown(0.0),
        }
    }

    /// Per-intent scores for `input`, in table order. Used to explain a
    /// classification; exact-trigger short-circuiting is not applied here.
    pub fn scores(&self, input: &str) -> Vec<IntentScore> {
        let normalized = text::normalize(input);
        let tokens = text::token_set(&normalized);
        self.table
            .intents()
            .iter()
            .map(|intent| IntentScore {
                intent: intent.name().to_string(),
                score: if normalized.is_empty() {
                    0.0
                } else {
                    self.score(intent, &normalized, &tokens)
                },
            })
            .collect()
    }

    fn score(
        &self,
        intent: &IntentDefinition,
        normalized: &str,
        tokens: &HashSet<String>,
    ) -> f64 {
        let phrase_hits = intent
            .triggers()
            .iter()
            .filter(|phrase| text::contains_phrase(normalized, phrase))
            .count();
        let pattern_hits = intent
            .patterns()
            .iter()
            .filter(|pattern| pattern.is_match(normalized))
            .count();
        let keyword_hits = tokens
            .iter()
            .filter(|token| intent.keywords().contains(token.as_str()))
            .count();
        let example_overlap = intent
            .example_tokens()
            .iter()
            .map(|example| example.intersection(tokens).count())
            .max()
            .unwrap_or(0);

        let w = &self.weights;
        w.phrase * phrase_hits as f64
            + w.pattern * pattern_hits as f64
            + w.keyword * keyword_hits as f64
            + w.example * example_overlap as f64
    }

    fn matched(&self, intent: &IntentDefinition, score: f64, confidence: f64) -> Classification {
        Classification {
            intent: intent.name().to_string(),
            score,
            confidence,
            response: intent.response().to_string(),
        }
    }

    fn unknown(&self, score: f64) -> Classification {
        Classification {
            intent: UNKNOWN_INTENT.to_string(),
            score,
            confidence: 0.0,
            response: self.table.fallback_response().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;

    const FALLBACK: &str = "Sorry, I only know about Hepatitis B.";
    const DEFINITION: &str = "Hepatitis B is a liver infection caused by the hepatitis B virus.";

    fn sample_table() -> Result<IntentTable> {
        let definition = IntentDefinition::new(
            "definition",
            ["what is hepatitis b", "hepatitis b definition"],
            DEFINITION,
        )?;
        let transmission = IntentDefinition::new(
            "transmission",
            ["transmission", "spread"],
            "It spreads through blood and some body fluids.",
        )?
        .with_patterns([r"\b(blood|needles?)\b"])?;
        let symptoms = IntentDefinition::new(
            "symptoms",
            ["symptoms", "jaundice"],
            "Many people have no symptoms.",
        )?
        .with_examples(["Why are my eyes yellow?"]);
        IntentTable::new(vec![definition, transmission, symptoms], FALLBACK)
    }

    fn classifier() -> Classifier {
        Classifier::new(sample_table().expect("valid table"), ScoringWeights::default())
    }

    #[test]
    fn exact_trigger_returns_definition() {
        let result = classifier().classify("what is hepatitis b");
        assert_eq!(result.intent, "definition");
        assert_eq!(result.response, DEFINITION);
        assert_eq!(result.confidence, 1.0);

        // Case and punctuation do not matter.
        let result = classifier().classify("What is Hepatitis B?");
        assert_eq!(result.intent, "definition");
    }

    #[test]
    fn every_trigger_maps_to_its_intent() {
        let classifier = classifier();
        for intent in classifier.table().intents() {
            for trigger in intent.triggers() {
                assert_eq!(
                    classifier.classify(trigger).intent,
                    intent.name(),
                    "trigger {:?}",
                    trigger
                );
            }
        }
    }

    #[test]
    fn nonsense_is_unknown_with_fallback() {
        let result = classifier().classify("asdkjasd nonsense query");
        assert!(result.is_unknown());
        assert_eq!(result.intent, UNKNOWN_INTENT);
        assert_eq!(result.response, FALLBACK);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn lone_weak_evidence_is_unknown() {
        let classifier = classifier();
        // A single shared example word: keyword 1.0 + example 0.8.
        let result = classifier.classify("why");
        assert!(result.is_unknown());
        assert!((result.score - 1.8).abs() < 1e-9);
        // A single pattern hit.
        let result = classifier.classify("needle");
        assert!(result.is_unknown());
        assert!((result.score - 2.0).abs() < 1e-9);
        // Function words carry no evidence at all.
        for input in ["me", "I'm", "was there"] {
            let result = classifier.classify(input);
            assert!(result.is_unknown(), "input {:?}", input);
            assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn empty_and_blank_input_is_unknown() {
        let classifier = classifier();
        for input in ["", "   ", "\t\n", "?!?"] {
            let result = classifier.classify(input);
            assert!(result.is_unknown(), "input {:?}", input);
            assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn combines_phrase_pattern_and_keyword_evidence() {
        let result = classifier().classify("Can sharing needles spread it?");
        assert_eq!(result.intent, "transmission");
        // phrase "spread" (2.0) + pattern (2.0) + keywords needles, spread (2.0)
        assert!((result.score - 6.0).abs() < 1e-9);
        assert!((result.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn example_overlap_counts() {
        let result = classifier().classify("why are my eyes so yellow");
        assert_eq!(result.intent, "symptoms");
        // keywords why, eyes, yellow (3.0) + 0.8 * overlap 3
        assert!((result.score - 5.4).abs() < 1e-9);
    }

    #[test]
    fn ties_go_to_first_defined_intent() -> Result<()> {
        let alpha = IntentDefinition::new("alpha", ["alpha"], "A")?;
        let beta = IntentDefinition::new("beta", ["beta"], "B")?;

        let forward = Classifier::new(
            IntentTable::new(vec![alpha.clone(), beta.clone()], FALLBACK)?,
            ScoringWeights::default(),
        );
        assert_eq!(forward.classify("alpha beta").intent, "alpha");

        let reversed = Classifier::new(
            IntentTable::new(vec![beta, alpha], FALLBACK)?,
            ScoringWeights::default(),
        );
        assert_eq!(reversed.classify("alpha beta").intent, "beta");
        Ok(())
    }

    #[test]
    fn below_threshold_is_unknown() -> Result<()> {
        let strict = Classifier::new(
            sample_table()?,
            ScoringWeights {
                min_score: 10.0,
                ..ScoringWeights::default()
            },
        );
        let result = strict.classify("does blood spread");
        assert!(result.is_unknown());
        assert!((result.score - 6.0).abs() < 1e-9);

        assert_eq!(classifier().classify("does blood spread").intent, "transmission");
        Ok(())
    }

    #[test]
    fn zero_threshold_still_needs_evidence() -> Result<()> {
        let lenient = Classifier::new(
            sample_table()?,
            ScoringWeights {
                min_score: 0.0,
                ..ScoringWeights::default()
            },
        );
        assert!(lenient.classify("asdkjasd").is_unknown());
        Ok(())
    }

    #[test]
    fn confidence_is_capped() -> Result<()> {
        let steep = Classifier::new(
            sample_table()?,
            ScoringWeights {
                confidence_scale: 1.0,
                ..ScoringWeights::default()
            },
        );
        assert_eq!(steep.classify("does blood spread").confidence, 1.0);
        Ok(())
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = classifier();
        let input = "is jaundice a symptom of blood infection";
        let first = classifier.classify(input);
        for _ in 0..10 {
            assert_eq!(classifier.classify(input), first);
        }
    }

    #[test]
    fn scores_follow_table_order() {
        let scores = classifier().scores("does blood spread");
        let names: Vec<_> = scores.iter().map(|s| s.intent.as_str()).collect();
        assert_eq!(names, vec!["definition", "transmission", "symptoms"]);
        assert_eq!(scores[0].score, 0.0);
        assert!((scores[1].score - 6.0).abs() < 1e-9);
    }
}
