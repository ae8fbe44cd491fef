use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Locator configuration. Every section is optional; an empty file is valid.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub gazetteer: GazetteerConfig,
    pub lemmatizer: LemmatizerConfig,
    pub matcher: MatcherConfig,
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GazetteerConfig {
    pub path: PathBuf,
    pub coordinate_order: CoordinateOrder,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spb_gazetteer.json"),
            coordinate_order: CoordinateOrder::LatLon,
        }
    }
}

/// Order of the two numbers in each `coordinates` pair of the gazetteer file.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateOrder {
    #[default]
    LatLon,
    LonLat,
}

impl CoordinateOrder {
    /// Split a file pair into `(lat, lon)`.
    pub fn lat_lon(self, pair: [f64; 2]) -> (f64, f64) {
        match self {
            CoordinateOrder::LatLon => (pair[0], pair[1]),
            CoordinateOrder::LonLat => (pair[1], pair[0]),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LemmatizerConfig {
    /// Tab-separated lemma dictionary file or directory of them
    pub dictionary: Option<PathBuf>,
    /// Memoise lemmas per raw token
    pub cache: bool,
}

impl Default for LemmatizerConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            cache: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MatcherConfig {
    /// Longest token window tried against street names
    pub max_window_tokens: usize,
    /// Accept streets whose content words all occur anywhere in the text
    pub loose_street_matching: bool,
    /// Street-type words ignored by loose matching
    pub generic_street_terms: Vec<String>,
    /// Words that make the text describe an intersection
    pub intersection_keywords: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_window_tokens: 6,
            loose_street_matching: true,
            generic_street_terms: [
                "улица",
                "проспект",
                "переулок",
                "набережная",
                "бульвар",
                "площадь",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            intersection_keywords: ["пересечение", "перекресток", "перекрёсток"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AggregatorConfig {
    pub fallback_lat: f64,
    pub fallback_lon: f64,
}

impl Default for AggregatorConfig {
    /// Saint Petersburg administrative center.
    fn default() -> Self {
        Self {
            fallback_lat: 59.9311,
            fallback_lon: 30.3609,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
