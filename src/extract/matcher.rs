//! Street and metro mention matching over tokenized text.

use hashbrown::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::config::MatcherConfig;
use crate::gazetteer::GazetteerStore;
use crate::models::{MetroStation, Street};
use crate::normalize::NameNormalizer;

/// An input text split into cleaned tokens and their lemmas.
#[derive(Debug, Clone)]
pub struct PreparedText {
    pub tokens: Vec<String>,
    pub lemmas: Vec<String>,
    lemma_set: HashSet<String>,
    /// Lemmas joined by single spaces, padded with one space on each side
    padded: String,
}

impl PreparedText {
    pub fn new(text: &str, normalizer: &NameNormalizer) -> Self {
        let tokens = normalizer.tokens(text);
        let lemmas: Vec<String> = tokens
            .iter()
            .map(|t| normalizer.lemmatizer().lemmatize(t).base)
            .collect();
        let lemma_set = lemmas.iter().cloned().collect();
        let padded = format!(" {} ", lemmas.join(" "));

        Self {
            tokens,
            lemmas,
            lemma_set,
            padded,
        }
    }

    /// Full lemmatized text, function words included.
    pub fn lemmatized(&self) -> &str {
        self.padded.trim()
    }

    /// True if `phrase` (space-separated lemmas) occurs as a contiguous run
    /// of whole lemmas.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        !phrase.is_empty() && self.padded.contains(&format!(" {} ", phrase))
    }

    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.lemma_set.contains(lemma)
    }
}

/// How a street was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Exact key match of the token window `start..=end`
    Window { start: usize, end: usize },
    /// Every content word of the name occurs somewhere in the text
    Loose,
}

#[derive(Debug, Clone, Copy)]
pub struct StreetMention<'a> {
    pub street: &'a Street,
    pub kind: MatchKind,
}

/// Streets and stations mentioned in one text.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub text: PreparedText,
    pub streets: Vec<StreetMention<'a>>,
    pub metros: Vec<&'a MetroStation>,
}

/// Finds gazetteer entities in free text.
pub struct MentionMatcher {
    store: Arc<GazetteerStore>,
    max_window_tokens: usize,
    loose_street_matching: bool,
    generic_terms: HashSet<String>,
}

impl MentionMatcher {
    pub fn new(store: Arc<GazetteerStore>, config: &MatcherConfig) -> Self {
        let generic_terms = config
            .generic_street_terms
            .iter()
            .map(|term| store.normalizer().normalize(term))
            .filter(|term| !term.is_empty())
            .collect();

        Self {
            store,
            max_window_tokens: config.max_window_tokens,
            loose_street_matching: config.loose_street_matching,
            generic_terms,
        }
    }

    pub fn prepare(&self, text: &str) -> PreparedText {
        PreparedText::new(text, self.store.normalizer())
    }

    /// Match streets and metro stations in `text`.
    pub fn match_text(&self, text: &str) -> MatchResult<'_> {
        self.match_prepared(self.prepare(text))
    }

    pub fn match_prepared(&self, text: PreparedText) -> MatchResult<'_> {
        let streets = self.match_streets(&text);
        let metros = self.match_metros(&text);

        debug!(
            "Matched {} street(s) and {} metro station(s) in {:?}",
            streets.len(),
            metros.len(),
            text.lemmatized()
        );

        MatchResult {
            text,
            streets,
            metros,
        }
    }

    /// Window scan, then the loose fallback for streets not yet found.
    ///
    /// Each street is reported once, at the first window that matches it;
    /// windows are visited by start index first.
    pub fn match_streets(&self, text: &PreparedText) -> Vec<StreetMention<'_>> {
        let normalizer = self.store.normalizer();
        let tokens = &text.tokens;

        let mut mentions = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for start in 0..tokens.len() {
            let last = tokens.len().min(start.saturating_add(self.max_window_tokens));
            for end in start..last {
                let key = normalizer.normalize_tokens(&tokens[start..=end]);
                if key.is_empty() {
                    continue;
                }
                if let Some(street) = self.store.street_by_key(&key) {
                    if seen.insert(street.name.as_str()) {
                        debug!("Street '{}' matched tokens {}..={}", street.name, start, end);
                        mentions.push(StreetMention {
                            street,
                            kind: MatchKind::Window { start, end },
                        });
                    }
                }
            }
        }

        if self.loose_street_matching {
            for (key, street) in self.store.streets() {
                if seen.contains(street.name.as_str()) {
                    continue;
                }
                if self.loose_match(key, text) {
                    debug!("Street '{}' matched loosely", street.name);
                    seen.insert(street.name.as_str());
                    mentions.push(StreetMention {
                        street,
                        kind: MatchKind::Loose,
                    });
                }
            }
        }

        mentions
    }

    /// Multi-word names whose non-generic words all occur in the text.
    fn loose_match(&self, key: &str, text: &PreparedText) -> bool {
        let words: Vec<&str> = key.split(' ').collect();
        if words.len() < 2 {
            return false;
        }
        let mut content = words
            .into_iter()
            .filter(|w| !self.generic_terms.contains(*w))
            .peekable();
        if content.peek().is_none() {
            return false;
        }
        content.all(|w| text.contains_lemma(w))
    }

    /// Stations whose whole key occurs contiguously in the lemmatized text.
    pub fn match_metros(&self, text: &PreparedText) -> Vec<&MetroStation> {
        self.store
            .metros()
            .filter(|(key, _)| text.contains_phrase(key))
            .map(|(_, station)| station)
            .collect()
    }

    pub fn store(&self) -> &Arc<GazetteerStore> {
        &self.store
    }
}
