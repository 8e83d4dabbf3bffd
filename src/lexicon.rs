//! Static sentiment lexicon and antonym table.
//!
//! Both tables are embedded at compile time and parsed once on first use.
//! Entries are immutable; the rest of the engine only ever reads them.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::label::Polarity;

static LEXICON: Lazy<HashMap<String, LexiconEntry>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, LexiconEntry>>(raw).expect("valid sentiment lexicon")
});

static ANTONYMS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../antonyms.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid antonym table")
});

/// Fallback replacement when a target word has no antonym entry.
pub const DEFAULT_ANTONYM: &str = "good";

/// One lexicon word: polarity, magnitude in [0, 1], and an optional tag
/// naming the class the word argues for (or against, as "NOT <class>").
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconEntry {
    pub sentiment: Polarity,
    pub value: f64,
    #[serde(default)]
    pub contributes_to: Option<String>,
}

/// Lexicon lookup for an already-normalized key.
#[inline]
pub fn lookup(key: &str) -> Option<&'static LexiconEntry> {
    LEXICON.get(key)
}

/// Antonym for a (normalized) word, falling back to [`DEFAULT_ANTONYM`].
pub fn antonym(word: &str) -> &'static str {
    ANTONYMS
        .get(word)
        .map(String::as_str)
        .unwrap_or(DEFAULT_ANTONYM)
}

/// Reduce a raw whitespace token to its lookup key: lowercase, alphabetic
/// characters only.
pub fn normalize_token(raw: &str) -> String {
    raw.chars()
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Tokenize text the way the scorer and the counterfactual generator both
/// see it: split on whitespace, normalize, drop tokens that normalize to
/// nothing (pure punctuation, digits).
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
}
