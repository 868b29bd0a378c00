//! # HepChat Knowledge Base
//!
//! File: cli/src/bot/knowledge.rs
//!
//! ## Overview
//!
//! An optional CSV of vetted question/answer pairs, grouped by intent:
//!
//! ```csv
//! intent,question_example,answer_summary,source
//! transmission,Can I get hep B from kissing?,Casual contact does not spread it.,CDC
//! ```
//!
//! It serves two purposes:
//! - its question examples become extra scoring evidence for their intents
//!   (see `IntentTable::absorb_knowledge`)
//! - once an intent is chosen, the answer whose example question best
//!   overlaps the user's question replaces the canonical response
//!
//! Intents are lower-cased and trimmed; rows without an intent are skipped.
//! The file is decoded leniently: invalid UTF-8 is replaced, not rejected.
//!
use super::text;
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One row of the knowledge CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    pub intent: String,
    pub question_example: String,
    pub answer_summary: String,
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    question_example: String,
    #[serde(default)]
    answer_summary: String,
    #[serde(default)]
    source: String,
}

/// Knowledge entries grouped by intent, in file order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    order: Vec<String>,
    entries: HashMap<String, Vec<KnowledgeEntry>>,
}

impl KnowledgeBase {
    /// Groups `entries` by intent. Entries with a blank intent are dropped.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let mut base = Self::default();
        for mut entry in entries {
            entry.intent = entry.intent.trim().to_lowercase();
            if entry.intent.is_empty() {
                continue;
            }
            if !base.entries.contains_key(&entry.intent) {
                base.order.push(entry.intent.clone());
            }
            base.entries
                .entry(entry.intent.clone())
                .or_default()
                .push(entry);
        }
        base
    }

    /// # Load Knowledge Base (`load`)
    ///
    /// Reads the knowledge CSV at `path`.
    ///
    /// ## Errors
    ///
    /// Fails if the file is missing or a row cannot be parsed as CSV.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!(ChatError::DataFile {
                path: path.to_path_buf(),
                reason: "knowledge base not found".into(),
            }));
        }
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read knowledge base: {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);
        let base = Self::from_csv_str(&content)
            .with_context(|| format!("Failed to parse knowledge base: {}", path.display()))?;
        info!(
            "Loaded {} knowledge entries for {} intents from {}",
            base.len(),
            base.order.len(),
            path.display()
        );
        Ok(base)
    }

    /// Parses knowledge rows from CSV text with a header line.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut entries = Vec::new();
        for (index, row) in reader.deserialize::<RawRow>().enumerate() {
            // Row 1 is the header.
            let row = row.with_context(|| format!("Malformed knowledge row {}", index + 2))?;
            entries.push(KnowledgeEntry {
                intent: row.intent,
                question_example: row.question_example,
                answer_summary: row.answer_summary,
                source: row.source,
            });
        }
        Ok(Self::from_entries(entries))
    }

    /// Intents that have at least one entry, in first-seen order.
    pub fn intents(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn entries_for(&self, intent: &str) -> &[KnowledgeEntry] {
        self.entries.get(intent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The answer for `intent` whose example question shares the most tokens
    /// with `question`; the earliest entry wins ties. Rendered with its source
    /// when one is recorded. `None` if the intent has no entries or the chosen
    /// answer is blank.
    pub fn best_answer(&self, intent: &str, question: &str) -> Option<String> {
        let question_tokens = text::token_set(question);
        let mut best: Option<(&KnowledgeEntry, usize)> = None;
        for entry in self.entries_for(intent) {
            let overlap = text::token_set(&entry.question_example)
                .intersection(&question_tokens)
                .count();
            let better = match best {
                Some((_, best_overlap)) => overlap > best_overlap,
                None => true,
            };
            if better {
                best = Some((entry, overlap));
            }
        }

        let (entry, overlap) = best?;
        debug!(
            "Knowledge answer for '{}' chosen with overlap {}",
            intent, overlap
        );
        let answer = entry.answer_summary.trim();
        if answer.is_empty() {
            return None;
        }
        let source = entry.source.trim();
        if source.is_empty() {
            Some(answer.to_string())
        } else {
            Some(format!("{} (Source: {})", answer, source))
        }
    }
}
