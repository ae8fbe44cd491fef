//! Combines coordinate candidates into one estimate.

use crate::config::AggregatorConfig;
use crate::models::{CoordinateCandidate, GeoPoint};

/// Unweighted mean of all candidates, or a fixed fallback when there are none.
///
/// Candidate confidence is ignored here; it is carried for reporting only.
#[derive(Debug, Clone, Copy)]
pub struct CandidateAggregator {
    fallback: GeoPoint,
}

impl CandidateAggregator {
    pub fn new(fallback: GeoPoint) -> Self {
        Self { fallback }
    }

    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self::new(GeoPoint::new(config.fallback_lat, config.fallback_lon))
    }

    pub fn fallback(&self) -> GeoPoint {
        self.fallback
    }

    pub fn aggregate(&self, candidates: &[CoordinateCandidate]) -> GeoPoint {
        match candidates {
            [] => self.fallback,
            [only] => only.point(),
            _ => {
                let n = candidates.len() as f64;
                let lat = candidates.iter().map(|c| c.lat).sum::<f64>() / n;
                let lon = candidates.iter().map(|c| c.lon).sum::<f64>() / n;
                GeoPoint::new(lat, lon)
            }
        }
    }
}

impl Default for CandidateAggregator {
    fn default() -> Self {
        Self::from_config(&AggregatorConfig::default())
    }
}
