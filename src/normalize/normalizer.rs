//! Text to canonical-key normalization.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use super::lemmatizer::{Lemmatizer, RuleLemmatizer};

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

/// Lowercase, fold `ё` into `е` and drop everything that is neither a word
/// character nor whitespace.
pub fn clean(text: &str) -> String {
    let lower = text.to_lowercase().replace('ё', "е");
    PUNCTUATION.replace_all(lower.trim(), "").into_owned()
}

/// Deterministic name normalizer.
///
/// The same instance builds gazetteer keys and normalizes queries, so a
/// raw string always maps to the same key on both sides.
#[derive(Clone)]
pub struct NameNormalizer {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl NameNormalizer {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// Cleaned whitespace tokens of a text.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        clean(text).split_whitespace().map(String::from).collect()
    }

    /// Canonical key: lemmas of all content tokens joined by single spaces.
    ///
    /// Prepositions, conjunctions and particles are dropped.
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_tokens(&self.tokens(text))
    }

    /// Same as [`normalize`](Self::normalize) for already cleaned tokens.
    pub fn normalize_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        tokens
            .iter()
            .map(|t| self.lemmatizer.lemmatize(t.as_ref()))
            .filter(|lemma| !lemma.category.is_function_word())
            .map(|lemma| lemma.base)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lemma of every cleaned token, function words included.
    pub fn lemmas(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .iter()
            .map(|t| self.lemmatizer.lemmatize(t).base)
            .collect()
    }

    pub fn lemmatizer(&self) -> &Arc<dyn Lemmatizer> {
        &self.lemmatizer
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(RuleLemmatizer::new()))
    }
}

impl std::fmt::Debug for NameNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameNormalizer").finish_non_exhaustive()
    }
}
