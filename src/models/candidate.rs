//! Coordinate candidates produced per input text.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Kind of evidence a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Metro,
    Intersection,
    StreetCenter,
}

impl CandidateSource {
    /// Fixed confidence per source kind.
    pub fn confidence(&self) -> f64 {
        match self {
            CandidateSource::Metro => 0.7,
            CandidateSource::Intersection => 0.9,
            CandidateSource::StreetCenter => 0.5,
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Metro => write!(f, "metro"),
            CandidateSource::Intersection => write!(f, "intersection"),
            CandidateSource::StreetCenter => write!(f, "street_center"),
        }
    }
}

/// A provisional coordinate estimate.
///
/// `confidence` is diagnostic only and never weights aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateCandidate {
    pub lat: f64,
    pub lon: f64,
    pub confidence: f64,
    pub source: CandidateSource,
    pub details: String,
}

impl CoordinateCandidate {
    pub fn new(source: CandidateSource, point: GeoPoint, details: String) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            confidence: source.confidence(),
            source,
            details,
        }
    }

    pub fn street_center(name: &str, point: GeoPoint) -> Self {
        Self::new(CandidateSource::StreetCenter, point, format!("Центр {}", name))
    }

    pub fn intersection(first: &str, second: &str, point: GeoPoint) -> Self {
        Self::new(
            CandidateSource::Intersection,
            point,
            format!("Пересечение {} и {}", first, second),
        )
    }

    pub fn metro(name: &str, point: GeoPoint) -> Self {
        Self::new(CandidateSource::Metro, point, format!("Станция метро {}", name))
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}
