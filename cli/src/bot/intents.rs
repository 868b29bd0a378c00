//! # HepChat Intent Table
//!
//! File: cli/src/bot/intents.rs
//!
//! ## Overview
//!
//! The intent table is the chatbot's entire knowledge of what it can answer:
//! an ordered list of intents, each with trigger phrases, optional regex
//! patterns, optional example questions, and one canonical response. It is
//! loaded once at startup and never mutated while serving.
//!
//! ## Architecture
//!
//! - `IntentDefinition`: one intent. Triggers are stored normalized; the
//!   keyword set and example token sets used by the classifier are derived
//!   when the definition is built, so classification does no re-parsing.
//! - `IntentTable`: the ordered definitions plus the fallback response for
//!   unmatched questions, the disclaimer appended to replies, and sample
//!   questions for the `/examples` endpoint.
//!
//! Construction validates the table invariants:
//! - at least one intent
//! - intent names unique, non-empty, and never `unknown`
//! - every intent has a non-empty response and at least one trigger
//! - a normalized trigger belongs to exactly one intent
//! - every pattern compiles
//!
//! ## File Format
//!
//! ```toml
//! fallback_response = "Sorry, I can only answer Hepatitis B questions."
//! disclaimer = "Educational information only, not medical advice."
//! samples = ["How does Hep B spread?"]
//!
//! [[intent]]
//! name = "transmission"
//! response = "Hepatitis B spreads through blood or certain body fluids."
//! triggers = ["how does hepatitis b spread", "transmission"]
//! patterns = ['\b(transmit|spread|contag)\b']
//! examples = ["Can I catch hep b from a razor?"]
//! ```
//!
use super::knowledge::KnowledgeBase;
use super::text;
use crate::common::fs::io::read_file_to_string;
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Intent name reported when no definition matches well enough.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Used when the table file does not set `fallback_response`.
pub const DEFAULT_FALLBACK_RESPONSE: &str = "I'm not sure I understood that. I can explain how \
Hepatitis B spreads, its symptoms, testing, vaccination, prevention, treatment, window periods, \
and lab markers. Could you rephrase your question?";

/// A single intent: what triggers it and what it answers.
#[derive(Debug, Clone)]
pub struct IntentDefinition {
    name: String,
    response: String,
    triggers: Vec<String>,
    patterns: Vec<Regex>,
    examples: Vec<String>,
    keywords: BTreeSet<String>,
    example_tokens: Vec<HashSet<String>>,
}

impl IntentDefinition {
    /// Creates a definition from its name, trigger phrases, and response.
    ///
    /// Triggers are normalized and de-duplicated, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or reserved, the response is empty, the
    /// trigger list is empty, or a trigger normalizes to nothing.
    pub fn new<I, S>(
        name: impl Into<String>,
        triggers: I,
        response: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(anyhow!(ChatError::IntentTable(
                "intent name must not be empty".into()
            )));
        }
        if name.eq_ignore_ascii_case(UNKNOWN_INTENT) {
            return Err(anyhow!(ChatError::IntentTable(format!(
                "'{}' is reserved for unmatched questions",
                UNKNOWN_INTENT
            ))));
        }

        let response = response.into().trim().to_string();
        if response.is_empty() {
            return Err(anyhow!(ChatError::IntentTable(format!(
                "intent '{}' has an empty response",
                name
            ))));
        }

        let mut normalized = Vec::new();
        for trigger in triggers {
            let raw = trigger.as_ref();
            let phrase = text::normalize(raw);
            if phrase.is_empty() {
                return Err(anyhow!(ChatError::IntentTable(format!(
                    "intent '{}' has a trigger with no words: {:?}",
                    name, raw
                ))));
            }
            if !normalized.contains(&phrase) {
                normalized.push(phrase);
            }
        }
        if normalized.is_empty() {
            return Err(anyhow!(ChatError::IntentTable(format!(
                "intent '{}' has no triggers",
                name
            ))));
        }

        let mut definition = Self {
            name,
            response,
            triggers: normalized,
            patterns: Vec::new(),
            examples: Vec::new(),
            keywords: BTreeSet::new(),
            example_tokens: Vec::new(),
        };
        definition.refresh_derived();
        Ok(definition)
    }

    /// Adds regex patterns, matched case-insensitively against normalized input.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let regex = RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|source| ChatError::Pattern {
                    intent: self.name.clone(),
                    source,
                })?;
            self.patterns.push(regex);
        }
        self.refresh_derived();
        Ok(self)
    }

    /// Adds example questions. Blank examples are ignored.
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push_examples(examples);
        self
    }

    fn push_examples<I, S>(&mut self, examples: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.examples.len();
        self.examples.extend(
            examples
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty()),
        );
        if self.examples.len() != before {
            self.refresh_derived();
        }
    }

    fn refresh_derived(&mut self) {
        let mut keywords = BTreeSet::new();
        for trigger in &self.triggers {
            keywords.extend(text::tokenize(trigger));
        }
        for example in &self.examples {
            keywords.extend(text::tokenize(example));
        }
        for pattern in &self.patterns {
            keywords.extend(text::pattern_words(pattern.as_str()));
        }
        self.keywords = keywords;
        self.example_tokens = self.examples.iter().map(|e| text::token_set(e)).collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// Normalized trigger phrases in definition order.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Single-word evidence for this intent.
    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub(crate) fn example_tokens(&self) -> &[HashSet<String>] {
        &self.example_tokens
    }
}

/// The validated, ordered set of intents plus reply texts.
#[derive(Debug, Clone)]
pub struct IntentTable {
    intents: Vec<IntentDefinition>,
    fallback_response: String,
    disclaimer: String,
    samples: Vec<String>,
}

impl IntentTable {
    /// Builds a table, checking the invariants listed in the module docs.
    pub fn new(
        intents: Vec<IntentDefinition>,
        fallback_response: impl Into<String>,
    ) -> Result<Self> {
        if intents.is_empty() {
            return Err(anyhow!(ChatError::IntentTable(
                "the table defines no intents".into()
            )));
        }

        let mut names = HashSet::new();
        let mut trigger_owner: HashMap<&str, &str> = HashMap::new();
        for intent in &intents {
            if !names.insert(intent.name()) {
                return Err(anyhow!(ChatError::IntentTable(format!(
                    "intent '{}' is defined more than once",
                    intent.name()
                ))));
            }
            for trigger in intent.triggers() {
                if let Some(owner) = trigger_owner.insert(trigger.as_str(), intent.name()) {
                    return Err(anyhow!(ChatError::IntentTable(format!(
                        "trigger '{}' is used by both '{}' and '{}'",
                        trigger,
                        owner,
                        intent.name()
                    ))));
                }
            }
        }

        let fallback_response = fallback_response.into().trim().to_string();
        if fallback_response.is_empty() {
            return Err(anyhow!(ChatError::IntentTable(
                "fallback response must not be empty".into()
            )));
        }

        Ok(Self {
            intents,
            fallback_response,
            disclaimer: String::new(),
            samples: Vec::new(),
        })
    }

    /// Text appended to every chatbot reply.
    pub fn with_disclaimer(mut self, disclaimer: impl Into<String>) -> Self {
        self.disclaimer = disclaimer.into().trim().to_string();
        self
    }

    /// Sample questions listed by the `/examples` endpoint.
    pub fn with_samples(mut self, samples: Vec<String>) -> Self {
        self.samples = samples;
        self
    }

    /// # Load Intent Table (`load`)
    ///
    /// Reads and validates the TOML intent table at `path`.
    ///
    /// ## Errors
    ///
    /// A missing, unreadable, unparsable, or invalid table is an error; the
    /// caller treats it as fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!(ChatError::DataFile {
                path: path.to_path_buf(),
                reason: "intent table not found".into(),
            }));
        }
        let content = read_file_to_string(path)?;
        let table = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load intent table from {}", path.display()))?;
        info!(
            "Loaded {} intents from {}",
            table.intents.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parses a table from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(content).context("Intent table is not valid TOML")?;

        let mut intents = Vec::with_capacity(raw.intents.len());
        for raw_intent in raw.intents {
            let definition =
                IntentDefinition::new(raw_intent.name, &raw_intent.triggers, raw_intent.response)?
                    .with_patterns(&raw_intent.patterns)?
                    .with_examples(&raw_intent.examples);
            debug!(
                "Intent '{}': {} triggers, {} patterns, {} examples, {} keywords",
                definition.name(),
                definition.triggers().len(),
                definition.patterns().len(),
                definition.examples().len(),
                definition.keywords().len()
            );
            intents.push(definition);
        }

        let fallback = raw
            .fallback_response
            .unwrap_or_else(|| DEFAULT_FALLBACK_RESPONSE.to_string());
        Ok(Self::new(intents, fallback)?
            .with_disclaimer(raw.disclaimer.unwrap_or_default())
            .with_samples(raw.samples))
    }

    /// Folds knowledge-base question examples into their intents so they
    /// count as scoring evidence. Rows for intents the table does not define
    /// are skipped with a warning.
    pub fn absorb_knowledge(&mut self, knowledge: &KnowledgeBase) {
        for intent_name in knowledge.intents() {
            let questions = knowledge
                .entries_for(intent_name)
                .iter()
                .map(|entry| entry.question_example.as_str());
            match self.intents.iter_mut().find(|d| d.name() == intent_name) {
                Some(definition) => definition.push_examples(questions),
                None => warn!(
                    "Knowledge base has entries for '{}', which is not in the intent table; \
                     ignoring them.",
                    intent_name
                ),
            }
        }
    }

    /// Definitions in table order (the classifier's tie-break order).
    pub fn intents(&self) -> &[IntentDefinition] {
        &self.intents
    }

    pub fn get(&self, name: &str) -> Option<&IntentDefinition> {
        self.intents.iter().find(|d| d.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fallback_response(&self) -> &str {
        &self.fallback_response
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimer
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawTable {
    fallback_response: Option<String>,
    disclaimer: Option<String>,
    #[serde(default)]
    samples: Vec<String>,
    #[serde(default, rename = "intent")]
    intents: Vec<RawIntent>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawIntent {
    name: String,
    response: String,
    triggers: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
}
