//! # HepChat Chatbot
//!
//! File: cli/src/bot/chatbot.rs
//!
//! ## Overview
//!
//! Turns a classification into the text a user sees. The classifier picks
//! the intent; the chatbot picks the words:
//!
//! 1. `unknown` answers with the table's fallback response.
//! 2. Otherwise the knowledge base answer that best matches the question is
//!    used, if the knowledge base has one for the intent.
//! 3. Otherwise the intent's canonical response.
//!
//! The table's disclaimer, when set, is appended after a blank line.
//!
//! A `Chatbot` is immutable once built and is shared across HTTP requests
//! behind an `Arc`.
//!
use super::classifier::{Classifier, ScoringWeights};
use super::intents::IntentTable;
use super::knowledge::KnowledgeBase;
use crate::core::config::DataConfig;
use crate::core::error::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

/// The answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub reply: String,
    pub intent: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct Chatbot {
    classifier: Classifier,
    knowledge: Option<KnowledgeBase>,
}

impl Chatbot {
    pub fn new(classifier: Classifier, knowledge: Option<KnowledgeBase>) -> Self {
        Self {
            classifier,
            knowledge,
        }
    }

    /// # Build From Data Files (`from_data`)
    ///
    /// Loads the intent table and, when configured, the knowledge base. The
    /// knowledge base's question examples are folded into the table before
    /// the classifier is built.
    ///
    /// ## Errors
    ///
    /// Any missing or invalid data file is an error.
    pub fn from_data(data: &DataConfig, weights: ScoringWeights) -> Result<Self> {
        let mut table = IntentTable::load(&data.intents)?;

        let knowledge = match &data.knowledge {
            Some(path) => {
                let base = KnowledgeBase::load(path)?;
                if base.is_empty() {
                    warn!("Knowledge base {} has no entries", path.display());
                }
                table.absorb_knowledge(&base);
                Some(base)
            }
            None => {
                debug!("No knowledge base configured");
                None
            }
        };

        info!(
            "Chatbot ready with {} intents{}",
            table.intents().len(),
            if knowledge.is_some() {
                " and a knowledge base"
            } else {
                ""
            }
        );
        Ok(Self::new(Classifier::new(table, weights), knowledge))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn table(&self) -> &IntentTable {
        self.classifier.table()
    }

    /// Classifies `message` and builds the reply text for it.
    pub fn reply(&self, message: &str) -> Reply {
        let classification = self.classifier.classify(message);
        debug!(
            "Message classified as '{}' (score {:.2}, confidence {:.2})",
            classification.intent, classification.score, classification.confidence
        );

        let body = if classification.is_unknown() {
            classification.response.clone()
        } else {
            self.knowledge
                .as_ref()
                .and_then(|kb| kb.best_answer(&classification.intent, message))
                .unwrap_or_else(|| classification.response.clone())
        };

        let disclaimer = self.table().disclaimer();
        let reply = if disclaimer.is_empty() {
            body
        } else {
            format!("{}\n\n{}", body, disclaimer)
        };

        Reply {
            reply,
            intent: classification.intent,
            confidence: classification.confidence,
        }
    }
}
