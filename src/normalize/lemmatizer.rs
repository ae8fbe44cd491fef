//! Lemmatization capability and the built-in rule-based implementation.

use hashbrown::HashMap;
use std::sync::RwLock;

/// Grammatical category, as far as normalization needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Preposition,
    Conjunction,
    Particle,
    Numeral,
    Other,
}

impl PartOfSpeech {
    /// Function words are dropped from normalized keys.
    pub fn is_function_word(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Preposition | PartOfSpeech::Conjunction | PartOfSpeech::Particle
        )
    }

    /// Parse a dictionary tag. Accepts OpenCorpora-style tags and plain names.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "PREP" | "PREPOSITION" => PartOfSpeech::Preposition,
            "CONJ" | "CONJUNCTION" => PartOfSpeech::Conjunction,
            "PRCL" | "PARTICLE" => PartOfSpeech::Particle,
            "NUMR" | "NUMB" | "NUMERAL" => PartOfSpeech::Numeral,
            _ => PartOfSpeech::Other,
        }
    }
}

/// Base form of a token plus its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemma {
    pub base: String,
    pub category: PartOfSpeech,
}

impl Lemma {
    pub fn new(base: impl Into<String>, category: PartOfSpeech) -> Self {
        Self {
            base: base.into(),
            category,
        }
    }
}

/// Maps a cleaned, lowercase token to its base form.
///
/// Implementations must be stable on their own output: lemmatizing a
/// returned base form yields the same base form again.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str) -> Lemma;
}

impl<L: Lemmatizer + ?Sized> Lemmatizer for Box<L> {
    fn lemmatize(&self, token: &str) -> Lemma {
        (**self).lemmatize(token)
    }
}

const PREPOSITIONS: &[&str] = &[
    "в", "во", "на", "у", "к", "ко", "с", "со", "о", "об", "обо", "от", "ото", "до", "по", "за",
    "из", "изо", "под", "подо", "над", "надо", "при", "про", "для", "без", "безо", "через",
    "между", "меж", "около", "возле", "вдоль", "вблизи", "напротив", "перед", "передо", "после",
    "среди", "сквозь", "вокруг", "мимо", "близ", "против", "согласно",
];

const CONJUNCTIONS: &[&str] = &[
    "и", "а", "но", "или", "либо", "что", "чтобы", "как", "когда", "если", "хотя", "зато",
    "однако", "тоже", "также", "потому", "поэтому", "пока", "будто", "словно", "причем",
];

const PARTICLES: &[&str] = &[
    "не", "ни", "же", "ж", "бы", "б", "ли", "ль", "ведь", "вот", "вон", "даже", "лишь", "только",
    "именно", "разве", "неужели", "уж", "пусть", "давай", "ка",
];

/// Stems whose inflected forms lose a fleeting vowel, mapped to the base word.
const IRREGULAR_STEMS: &[(&str, &str)] = &[
    ("перекрестк", "перекресток"),
    ("переулк", "переулок"),
    ("угл", "угол"),
    ("рынк", "рынок"),
    ("дворц", "дворец"),
    ("конц", "конец"),
    ("поселк", "поселок"),
    ("городк", "городок"),
];

/// Inflectional endings, longest first.
///
/// `ов`/`ев` are absent: stripped after an adjectival ending they turn
/// "Садовая" into "сад" and "Дворцовая" into "дворец".
const ENDINGS: &[&str] = &[
    "ого", "его", "ому", "ему", "ыми", "ими", "ами", "ями", "ая", "яя", "ое", "ее", "ые", "ие",
    "ый", "ий", "ой", "ей", "ую", "юю", "ых", "их", "ым", "им", "ом", "ем", "ах", "ях", "ам",
    "ям", "ия", "ии", "ию", "ье", "ья", "ьи", "ью", "а", "я", "о", "е", "ы", "и", "у", "ю", "ь",
    "й",
];

const MIN_STEM_CHARS: usize = 3;

/// Dictionary-free lemmatizer for Russian street and station names.
///
/// Strips inflectional endings until none applies, so the result is a
/// stem rather than a dictionary lemma. Coverage is coarser than a full
/// morphological analyzer but every inflection of a regular name reduces
/// to the same key.
#[derive(Debug, Clone)]
pub struct RuleLemmatizer {
    function_words: HashMap<&'static str, PartOfSpeech>,
    irregular: HashMap<&'static str, &'static str>,
}

impl RuleLemmatizer {
    pub fn new() -> Self {
        let mut function_words = HashMap::new();
        for word in PREPOSITIONS {
            function_words.insert(*word, PartOfSpeech::Preposition);
        }
        for word in CONJUNCTIONS {
            function_words.insert(*word, PartOfSpeech::Conjunction);
        }
        for word in PARTICLES {
            function_words.insert(*word, PartOfSpeech::Particle);
        }

        Self {
            function_words,
            irregular: IRREGULAR_STEMS.iter().copied().collect(),
        }
    }

    fn category(&self, token: &str, base: &str) -> PartOfSpeech {
        if let Some(pos) = self
            .function_words
            .get(token)
            .or_else(|| self.function_words.get(base))
        {
            return *pos;
        }
        if token.chars().all(|c| c.is_numeric()) {
            return PartOfSpeech::Numeral;
        }
        PartOfSpeech::Other
    }

    /// One rewrite: an irregular stem or the longest strippable ending.
    fn rewrite(&self, word: &str) -> Option<String> {
        if let Some(base) = self.irregular.get(word) {
            return Some(base.to_string());
        }

        let len = word.chars().count();
        for ending in ENDINGS {
            let ending_len = ending.chars().count();
            if len >= MIN_STEM_CHARS + ending_len && word.ends_with(ending) {
                return Some(word[..word.len() - ending.len()].to_string());
            }
        }
        None
    }

    fn reduce(&self, token: &str) -> String {
        if self.function_words.contains_key(token) || token.chars().any(|c| c.is_numeric()) {
            return token.to_string();
        }

        // Ending rewrites shorten the word and irregular bases are fixed
        // points, so this reaches a fixed point.
        let mut word = token.to_string();
        while let Some(next) = self.rewrite(&word) {
            word = next;
        }
        word
    }
}

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, token: &str) -> Lemma {
        let token = token.replace('ё', "е");
        let base = self.reduce(&token);
        let category = self.category(&token, &base);
        Lemma { base, category }
    }
}

/// Memoises another lemmatizer per raw token.
pub struct CachedLemmatizer<L> {
    inner: L,
    cache: RwLock<HashMap<String, Lemma>>,
}

impl<L: Lemmatizer> CachedLemmatizer<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct tokens seen so far
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: Lemmatizer> Lemmatizer for CachedLemmatizer<L> {
    fn lemmatize(&self, token: &str) -> Lemma {
        if let Ok(cache) = self.cache.read() {
            if let Some(lemma) = cache.get(token) {
                return lemma.clone();
            }
        }

        let lemma = self.inner.lemmatize(token);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(token.to_string(), lemma.clone());
        }
        lemma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(token: &str) -> String {
        RuleLemmatizer::new().lemmatize(token).base
    }

    #[test]
    fn test_inflections_share_base() {
        assert_eq!(base("невский"), base("невского"));
        assert_eq!(base("невский"), base("невском"));
        assert_eq!(base("проспект"), base("проспекта"));
        assert_eq!(base("улица"), base("улицы"));
        assert_eq!(base("улица"), base("улицей"));
        assert_eq!(base("станция"), base("станции"));
        assert_eq!(base("спортивная"), base("спортивной"));
        assert_eq!(base("пересечение"), base("пересечении"));
        assert_eq!(base("пересечение"), base("пересечением"));
    }

    #[test]
    fn test_fleeting_vowel_stems() {
        assert_eq!(base("перекресток"), "перекресток");
        assert_eq!(base("перекрестке"), "перекресток");
        assert_eq!(base("перекрёстка"), "перекресток");
        assert_eq!(base("переулке"), "переулок");
        assert_eq!(base("углу"), "угол");
    }

    #[test]
    fn test_base_is_stable() {
        let lemmatizer = RuleLemmatizer::new();
        for word in [
            "садовой",
            "литейного",
            "площади",
            "восстания",
            "набережной",
            "перекрестка",
            "метро",
            "дтп",
        ] {
            let once = lemmatizer.lemmatize(word).base;
            let twice = lemmatizer.lemmatize(&once).base;
            assert_eq!(once, twice, "unstable base for {}", word);
        }
    }

    #[test]
    fn test_long_token_reaches_fixed_point() {
        let lemmatizer = RuleLemmatizer::new();
        let token = "а".repeat(23);
        let once = lemmatizer.lemmatize(&token).base;
        assert_eq!(once, "ааа");
        assert_eq!(lemmatizer.lemmatize(&once).base, once);
    }

    #[test]
    fn test_adjectival_suffix_kept() {
        assert_eq!(base("садовая"), "садов");
        assert_eq!(base("садовой"), "садов");
        assert_ne!(base("садовая"), base("сад"));
        assert_ne!(base("садовая"), base("саду"));
        assert_eq!(base("дворцовая"), "дворцов");
        assert_ne!(base("дворцовая"), base("дворца"));
        assert_eq!(base("гороховой"), base("гороховая"));
    }

    #[test]
    fn test_irregular_targets_are_fixed_points() {
        let lemmatizer = RuleLemmatizer::new();
        for (_, target) in IRREGULAR_STEMS {
            assert_eq!(lemmatizer.lemmatize(target).base, *target);
        }
    }

    #[test]
    fn test_function_word_categories() {
        let lemmatizer = RuleLemmatizer::new();
        assert_eq!(lemmatizer.lemmatize("на").category, PartOfSpeech::Preposition);
        assert_eq!(lemmatizer.lemmatize("и").category, PartOfSpeech::Conjunction);
        assert_eq!(lemmatizer.lemmatize("не").category, PartOfSpeech::Particle);
        assert_eq!(lemmatizer.lemmatize("улица").category, PartOfSpeech::Other);
        assert_eq!(lemmatizer.lemmatize("12").category, PartOfSpeech::Numeral);
    }

    #[test]
    fn test_short_and_numeric_tokens_untouched() {
        assert_eq!(base("дом"), "дом");
        assert_eq!(base("2я"), "2я");
    }

    #[test]
    fn test_cache_returns_same_lemma() {
        let cached = CachedLemmatizer::new(RuleLemmatizer::new());
        assert!(cached.is_empty());
        let first = cached.lemmatize("проспекта");
        let second = cached.lemmatize("проспекта");
        assert_eq!(first, second);
        assert_eq!(cached.len(), 1);
    }
}
