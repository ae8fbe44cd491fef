use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use rta_locator::GeoPoint;

/// Labeled test set: `{"text_list": [{"text": ..., "rta_coords": [lat, lon]}]}`
#[derive(Debug, Deserialize)]
pub struct TestSet {
    pub text_list: Vec<LabeledText>,
}

#[derive(Debug, Deserialize)]
pub struct LabeledText {
    pub text: String,
    /// Actual accident location as `[lat, lon]`
    pub rta_coords: [f64; 2],
}

impl LabeledText {
    pub fn actual(&self) -> GeoPoint {
        GeoPoint::new(self.rta_coords[0], self.rta_coords[1])
    }
}

#[derive(Debug, Serialize)]
pub struct TextResult {
    pub id: usize,
    pub predicted: [f64; 2],
    pub actual: [f64; 2],
    pub error_meters: f64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub results: Vec<TextResult>,
    pub average_error_meters: f64,
    pub generated_at: DateTime<Utc>,
}

pub fn load_test_set(path: &Path) -> Result<TestSet> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open test set: {}", path.display()))?;
    let set: TestSet = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse test set: {}", path.display()))?;
    info!("Loaded {} labeled texts", set.text_list.len());
    Ok(set)
}

/// Geodesic distance between two points in metres.
pub fn error_meters(predicted: GeoPoint, actual: GeoPoint) -> f64 {
    Geodesic.distance(
        Point::new(predicted.lon, predicted.lat),
        Point::new(actual.lon, actual.lat),
    )
}

pub fn text_result(id: usize, predicted: GeoPoint, actual: GeoPoint) -> TextResult {
    TextResult {
        id,
        predicted: [predicted.lat, predicted.lon],
        actual: [actual.lat, actual.lon],
        error_meters: error_meters(predicted, actual),
    }
}

impl Report {
    pub fn new(results: Vec<TextResult>) -> Self {
        let average_error_meters = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.error_meters).sum::<f64>() / results.len() as f64
        };
        Self {
            results,
            average_error_meters,
            generated_at: Utc::now(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create results file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// First `width - 3` characters of the text on one line, followed by `...`
pub fn snippet(text: &str, width: usize) -> String {
    let flat = text.replace('\n', " ");
    let cut: String = flat.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_error_for_same_point() {
        let p = GeoPoint::new(59.9311, 30.3609);
        assert!(error_meters(p, p).abs() < 1e-6);
    }

    #[test]
    fn test_error_one_hundredth_degree_latitude() {
        // roughly 1.11 km along a meridian
        let e = error_meters(GeoPoint::new(59.93, 30.35), GeoPoint::new(59.94, 30.35));
        assert!(e > 1100.0 && e < 1120.0, "got {}", e);
    }

    #[test]
    fn test_average_error() {
        let report = Report::new(vec![
            TextResult { id: 1, predicted: [0.0; 2], actual: [0.0; 2], error_meters: 100.0 },
            TextResult { id: 2, predicted: [0.0; 2], actual: [0.0; 2], error_meters: 300.0 },
        ]);
        assert_eq!(report.average_error_meters, 200.0);
        assert_eq!(Report::new(vec![]).average_error_meters, 0.0);
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("ДТП\nна Невском", 10), "ДТП на ...");
    }

    #[test]
    fn test_parse_test_set() {
        let set: TestSet = serde_json::from_str(
            r#"{"text_list": [{"text": "ДТП", "rta_coords": [59.93, 30.35]}]}"#,
        )
        .unwrap();
        assert_eq!(set.text_list[0].actual(), GeoPoint::new(59.93, 30.35));
    }
}
