//! Text-to-coordinate pipeline.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::aggregate::CandidateAggregator;
use super::intersection::IntersectionResolver;
use super::matcher::MentionMatcher;
use crate::config::Config;
use crate::error::Result;
use crate::gazetteer::GazetteerStore;
use crate::models::{CoordinateCandidate, GeoPoint};
use crate::normalize::{build_lemmatizer, NameNormalizer};

/// Everything recognized in one text.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub lemmatized: String,
    pub streets: Vec<String>,
    pub metros: Vec<String>,
    pub candidates: Vec<CoordinateCandidate>,
}

/// Final estimate with the evidence behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub point: GeoPoint,
    pub candidates: Vec<CoordinateCandidate>,
}

/// Owns the matcher, resolver and aggregator around one shared gazetteer.
pub struct Locator {
    matcher: MentionMatcher,
    resolver: IntersectionResolver,
    aggregator: CandidateAggregator,
}

impl Locator {
    pub fn new(store: Arc<GazetteerStore>, config: &Config) -> Self {
        let resolver =
            IntersectionResolver::new(&config.matcher.intersection_keywords, store.normalizer());
        Self {
            matcher: MentionMatcher::new(store, &config.matcher),
            resolver,
            aggregator: CandidateAggregator::from_config(&config.aggregator),
        }
    }

    /// Build the lemmatizer and load the gazetteer named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let lemmatizer = build_lemmatizer(&config.lemmatizer)?;
        let normalizer = NameNormalizer::new(lemmatizer);
        let store = GazetteerStore::load(
            &config.gazetteer.path,
            normalizer,
            config.gazetteer.coordinate_order,
        )?;
        info!(
            "Locator ready with {} streets and {} metro stations",
            store.street_count(),
            store.metro_count()
        );
        Ok(Self::new(Arc::new(store), config))
    }

    /// Match entities and build the candidate list.
    ///
    /// Order: each street's center followed by its intersections with the
    /// streets after it, then metro stations.
    pub fn analyze(&self, text: &str) -> Analysis {
        let result = self.matcher.match_text(text);
        let mut candidates = Vec::new();

        for (i, mention) in result.streets.iter().enumerate() {
            let street = mention.street;
            if let Some(center) = street.center() {
                candidates.push(CoordinateCandidate::street_center(&street.name, center));
            }
            for other in &result.streets[i + 1..] {
                if let Some(point) = self.resolver.resolve(street, other.street, &result.text) {
                    candidates.push(CoordinateCandidate::intersection(
                        &street.name,
                        &other.street.name,
                        point,
                    ));
                }
            }
        }

        for station in &result.metros {
            candidates.push(CoordinateCandidate::metro(&station.name, station.point()));
        }

        for candidate in &candidates {
            debug!(
                "Candidate {} ({:.1}): {:.6}, {:.6} {}",
                candidate.source, candidate.confidence, candidate.lat, candidate.lon, candidate.details
            );
        }

        Analysis {
            lemmatized: result.text.lemmatized().to_string(),
            streets: result.streets.iter().map(|m| m.street.name.clone()).collect(),
            metros: result.metros.iter().map(|m| m.name.clone()).collect(),
            candidates,
        }
    }

    pub fn candidates(&self, text: &str) -> Vec<CoordinateCandidate> {
        self.analyze(text).candidates
    }

    pub fn locate(&self, text: &str) -> Location {
        let candidates = self.candidates(text);
        let point = self.aggregator.aggregate(&candidates);
        Location { point, candidates }
    }

    pub fn store(&self) -> &Arc<GazetteerStore> {
        self.matcher.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordinateOrder;
    use crate::models::CandidateSource;
    use serde_json::json;

    fn fixture() -> Locator {
        let document = json!({
            "metro_stations": {
                "станция метро Спортивная": {"name": "станция метро Спортивная", "lat": 59.9502, "lon": 30.2883}
            },
            "streets": {
                "Невский проспект": {"name": "Невский проспект", "coordinates": [[59.93, 30.30], [59.93, 30.35], [59.93, 30.40]]},
                "Литейный проспект": {"name": "Литейный проспект", "coordinates": [[59.90, 30.348], [59.96, 30.348]]},
                "Садовая улица": {"name": "Садовая улица", "coordinates": [[59.92, 30.30], [59.92, 30.35], [59.92, 30.40]]}
            }
        });
        let store =
            GazetteerStore::from_document(document, NameNormalizer::default(), CoordinateOrder::LatLon)
                .unwrap();
        Locator::new(Arc::new(store), &Config::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_no_entities_gives_fallback() {
        let locator = fixture();
        let location = locator.locate("Столкновение двух автомобилей во дворе жилого дома");
        assert!(location.candidates.is_empty());
        assert_eq!(location.point, GeoPoint::new(59.9311, 30.3609));

        assert_eq!(locator.locate("").point, GeoPoint::new(59.9311, 30.3609));
    }

    #[test]
    fn test_single_street_is_mid_polyline_point() {
        let locator = fixture();
        let location = locator.locate("Наезд на пешехода на Невском проспекте.");
        assert_eq!(location.candidates.len(), 1);
        assert_eq!(location.candidates[0].source, CandidateSource::StreetCenter);
        assert_eq!(location.candidates[0].confidence, 0.5);
        assert_eq!(location.point, GeoPoint::new(59.93, 30.35));
    }

    #[test]
    fn test_crossing_streets_with_keyword() {
        let locator = fixture();
        let location =
            locator.locate("ДТП на пересечении Невского проспекта и Литейного проспекта");

        let sources: Vec<CandidateSource> =
            location.candidates.iter().map(|c| c.source).collect();
        assert_eq!(
            sources,
            vec![
                CandidateSource::StreetCenter,
                CandidateSource::Intersection,
                CandidateSource::StreetCenter
            ]
        );
        let crossing = &location.candidates[1];
        assert_eq!(crossing.confidence, 0.9);
        assert_eq!(crossing.details, "Пересечение Невский проспект и Литейный проспект");
        assert!(approx(crossing.lat, 59.93) && approx(crossing.lon, 30.348));

        // Nevsky center, crossing, Liteyny center (mid index of two points)
        let lat = (59.93 + 59.93 + 59.96) / 3.0;
        let lon = (30.35 + 30.348 + 30.348) / 3.0;
        assert!(approx(location.point.lat, lat));
        assert!(approx(location.point.lon, lon));
    }

    #[test]
    fn test_non_crossing_streets_with_keyword() {
        let locator = fixture();
        let location = locator.locate("Авария на перекрёстке Невского проспекта и Садовой улицы");
        assert_eq!(location.candidates.len(), 2);
        assert!(location
            .candidates
            .iter()
            .all(|c| c.source == CandidateSource::StreetCenter));
        assert!(approx(location.point.lat, (59.93 + 59.92) / 2.0));
        assert!(approx(location.point.lon, 30.35));
    }

    #[test]
    fn test_crossing_streets_without_keyword() {
        let locator = fixture();
        let candidates = locator.candidates("Невский проспект и Литейный проспект");
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_metro_station() {
        let locator = fixture();
        let analysis = locator.analyze("Сбили пешехода у станции метро «Спортивная»");
        assert_eq!(analysis.metros, vec!["станция метро Спортивная"]);
        assert_eq!(analysis.candidates.len(), 1);
        let metro = &analysis.candidates[0];
        assert_eq!(metro.source, CandidateSource::Metro);
        assert_eq!(metro.confidence, 0.7);
        assert_eq!(metro.details, "Станция метро станция метро Спортивная");

        let location = locator.locate("Сбили пешехода у станции метро «Спортивная»");
        assert_eq!(location.point, GeoPoint::new(59.9502, 30.2883));
    }

    #[test]
    fn test_metro_candidates_follow_street_candidates() {
        let locator = fixture();
        let analysis = locator.analyze("станция метро Спортивная, Садовая улица");
        let sources: Vec<CandidateSource> =
            analysis.candidates.iter().map(|c| c.source).collect();
        assert_eq!(sources, vec![CandidateSource::StreetCenter, CandidateSource::Metro]);
    }

    #[test]
    fn test_from_config_missing_gazetteer() {
        let mut config = Config::default();
        config.gazetteer.path = "/nonexistent/spb_gazetteer.json".into();
        assert!(matches!(
            Locator::from_config(&config),
            Err(crate::error::Error::NotFound(_))
        ));
    }
}
