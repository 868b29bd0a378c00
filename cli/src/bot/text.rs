//! # HepChat Text Normalization
//!
//! File: cli/src/bot/text.rs
//!
//! ## Overview
//!
//! Every string the classifier compares (user questions, trigger phrases,
//! example questions) goes through the same normalization so matching is
//! insensitive to case, punctuation, and spacing:
//!
//! - lowercase
//! - apostrophes removed (`don't` -> `dont`)
//! - typographic dashes folded to `-`; a hyphen survives only between two
//!   letters or digits (`anti-HBs` stays one word)
//! - any other non-alphanumeric character becomes a space
//! - whitespace collapsed and trimmed
//!
//! Tokenization drops a small stopword list. The topic words themselves
//! (`hepatitis`, `hep`, `b`) are stopwords because nearly every question
//! contains them and they carry no intent.
//!
use std::collections::HashSet;

/// Words ignored when comparing token sets.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "for", "of", "and", "or", "is", "are", "in", "on", "with", "about",
    "what", "how", "does", "do", "can", "i", "you", "it", "be", "get", "from", "when", "if", "my",
    "your", "this", "that", "b", "hep", "hepatitis",
    // Pronouns, contractions (apostrophes are already gone) and auxiliaries.
    "me", "im", "am", "was", "were", "there", "here", "we", "our", "us", "they", "them", "their",
    "he", "she", "his", "her", "its", "ive", "id", "ill", "youre", "at", "by", "as", "but", "so",
    "just", "which", "who", "where", "will", "would", "could", "has", "have", "had", "been", "any",
    "some", "all", "really", "much", "one",
];

/// Returns true if `word` is in [`STOPWORDS`].
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Normalizes free text for matching. See the module docs for the rules.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '`'))
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' => '-',
            other => other,
        })
        .collect();

    let mut spaced = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let keep = if c.is_ascii_alphanumeric() {
            true
        } else if c == '-' {
            let before = i > 0 && chars[i - 1].is_ascii_alphanumeric();
            let after = chars.get(i + 1).is_some_and(|n| n.is_ascii_alphanumeric());
            before && after
        } else {
            false
        };
        spaced.push(if keep { c } else { ' ' });
    }

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes `text` and returns its non-stopword tokens in order.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|tok| !tok.is_empty() && !is_stopword(tok))
        .map(str::to_string)
        .collect()
}

/// Token set of `text`, for overlap counting.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Literal words (three or more ASCII letters) in a regex source, lowercased
/// and with stopwords removed. `\b(vacci(nation|nate))\b` yields `vacci`,
/// `nation`, `nate`. The character after a backslash is an escape, never
/// part of a word, so `\bword` yields `word`.
pub fn pattern_words(pattern: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    // A trailing sentinel flushes the last run.
    for c in pattern.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphabetic() && !escaped {
            current.push(c.to_ascii_lowercase());
            continue;
        }
        escaped = c == '\\' && !escaped;
        if current.len() >= 3 && !is_stopword(&current) {
            words.push(std::mem::take(&mut current));
        }
        current.clear();
    }
    words
}

/// Whole-word containment of an already-normalized `phrase` in an
/// already-normalized `text`.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let padded_text = format!(" {} ", text);
    padded_text.contains(&format!(" {} ", phrase))
}
