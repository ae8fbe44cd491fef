//! Lemma dictionary loaded from tab-separated files.
//!
//! Each line is `form<TAB>lemma[<TAB>tag]`; `#` starts a comment. Files may
//! be gzip-compressed. A directory is walked recursively and every `.tsv`,
//! `.txt` or `.gz` file inside is loaded.

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use hashbrown::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::lemmatizer::{Lemma, Lemmatizer, PartOfSpeech, RuleLemmatizer};
use super::normalizer::clean;
use crate::error::{Error, Result};

/// Dictionary lookup with a fallback lemmatizer for unknown forms.
pub struct DictionaryLemmatizer<F = RuleLemmatizer> {
    /// Form -> lemma. Every lemma is also registered as its own form.
    forms: HashMap<String, String>,
    /// Lemma -> category
    categories: HashMap<String, PartOfSpeech>,
    fallback: F,
}

impl DictionaryLemmatizer<RuleLemmatizer> {
    /// Load from a file or directory, falling back to the rule lemmatizer.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_fallback(path, RuleLemmatizer::new())
    }
}

impl<F: Lemmatizer> DictionaryLemmatizer<F> {
    pub fn with_fallback(fallback: F) -> Self {
        Self {
            forms: HashMap::new(),
            categories: HashMap::new(),
            fallback,
        }
    }

    pub fn load_with_fallback<P: AsRef<Path>>(path: P, fallback: F) -> Result<Self> {
        let path = path.as_ref();
        let mut dictionary = Self::with_fallback(fallback);

        if !path.exists() {
            return Err(Error::dictionary(path, "path does not exist"));
        }

        info!("Loading lemma dictionary from {}", path.display());

        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry.map_err(|e| Error::dictionary(path, e.to_string()))?;
                let file = entry.path();
                if !file.is_file() {
                    continue;
                }
                let wanted = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .map_or(false, |e| matches!(e, "tsv" | "txt" | "gz"));
                if !wanted {
                    continue;
                }
                dictionary.load_file(file)?;
            }
        } else {
            dictionary.load_file(path)?;
        }

        dictionary.register_lemmas();
        info!(
            "Loaded {} forms for {} lemmas",
            dictionary.forms.len(),
            dictionary.categories.len()
        );
        Ok(dictionary)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        self.read_entries(reader, path)
    }

    fn read_entries<R: Read>(&mut self, reader: R, path: &Path) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        for (line, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| Error::dictionary(path, e.to_string()))?;
            if record.len() < 2 {
                return Err(Error::dictionary(
                    path,
                    format!("record {} has {} field(s), expected form and lemma", line + 1, record.len()),
                ));
            }

            let form = clean(&record[0]);
            let lemma = clean(&record[1]);
            if form.is_empty() || lemma.is_empty() {
                continue;
            }
            if form.contains(char::is_whitespace) || lemma.contains(char::is_whitespace) {
                warn!("Skipping multi-word dictionary entry '{}' in {}", &record[0], path.display());
                continue;
            }

            let category = record
                .get(2)
                .map(PartOfSpeech::from_tag)
                .unwrap_or(PartOfSpeech::Other);
            self.categories.entry(lemma.clone()).or_insert(category);
            self.forms.insert(form, lemma);
        }
        Ok(())
    }

    /// Make every lemma map to itself so lemmas are fixed points.
    fn register_lemmas(&mut self) {
        let lemmas: Vec<String> = self.categories.keys().cloned().collect();
        for lemma in lemmas {
            self.forms.insert(lemma.clone(), lemma);
        }
    }

    fn entry(&self, lemma: &str) -> Lemma {
        let category = self
            .categories
            .get(lemma)
            .copied()
            .unwrap_or(PartOfSpeech::Other);
        Lemma::new(lemma, category)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl<F: Lemmatizer> Lemmatizer for DictionaryLemmatizer<F> {
    fn lemmatize(&self, token: &str) -> Lemma {
        let token = token.replace('ё', "е");
        if let Some(lemma) = self.forms.get(&token) {
            return self.entry(lemma);
        }

        let guess = self.fallback.lemmatize(&token);
        match self.forms.get(&guess.base) {
            Some(lemma) => self.entry(lemma),
            None => guess,
        }
    }
}
