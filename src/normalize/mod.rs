//! Name normalization: cleaning, lemmatization and function-word removal.
//!
//! The morphological analyzer sits behind the [`Lemmatizer`] trait so a
//! rule-based stemmer, a lemma dictionary or anything else can back it.

mod dictionary;
mod lemmatizer;
mod normalizer;

use std::sync::Arc;

pub use dictionary::DictionaryLemmatizer;
pub use lemmatizer::{CachedLemmatizer, Lemma, Lemmatizer, PartOfSpeech, RuleLemmatizer};
pub use normalizer::{clean, NameNormalizer};

use crate::config::LemmatizerConfig;
use crate::error::Result;

/// Build the lemmatizer described by the configuration.
pub fn build_lemmatizer(config: &LemmatizerConfig) -> Result<Arc<dyn Lemmatizer>> {
    let lemmatizer: Box<dyn Lemmatizer> = match &config.dictionary {
        Some(path) => Box::new(DictionaryLemmatizer::load(path)?),
        None => Box::new(RuleLemmatizer::new()),
    };

    if config.cache {
        Ok(Arc::new(CachedLemmatizer::new(lemmatizer)))
    } else {
        Ok(Arc::from(lemmatizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_lemmatizer() {
        let lemmatizer = build_lemmatizer(&LemmatizerConfig::default()).unwrap();
        assert_eq!(
            lemmatizer.lemmatize("проспекта").base,
            lemmatizer.lemmatize("проспект").base
        );
    }

    #[test]
    fn test_build_with_missing_dictionary_fails() {
        let config = LemmatizerConfig {
            dictionary: Some("/nonexistent/dict".into()),
            cache: false,
        };
        assert!(build_lemmatizer(&config).is_err());
    }
}
