//! Gazetteer entities: metro stations and street polylines.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A metro station with its stored coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroStation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl MetroStation {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// A named street as one or more concatenated polylines.
///
/// Coordinates are stored as `x = lon`, `y = lat`. Streets merged from
/// several source ways keep their points in discovery order, so the
/// polyline can jump between unrelated segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Street {
    pub name: String,
    pub coordinates: Vec<Coord<f64>>,
}

impl Street {
    pub fn new(name: impl Into<String>, coordinates: Vec<Coord<f64>>) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }

    /// Representative point: the coordinate at the middle index.
    ///
    /// This is not a geometric centroid.
    pub fn center(&self) -> Option<GeoPoint> {
        self.coordinates
            .get(self.coordinates.len() / 2)
            .copied()
            .map(GeoPoint::from)
    }

    pub fn line_string(&self) -> LineString<f64> {
        LineString::new(self.coordinates.clone())
    }

    /// Append the points of another way sharing this street's name.
    pub fn merge(&mut self, other: Street) {
        self.coordinates.extend(other.coordinates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coord<f64> {
        Coord { x: lon, y: lat }
    }

    #[test]
    fn test_center_is_middle_index() {
        let street = Street::new(
            "Невский проспект",
            vec![coord(1.0, 1.0), coord(2.0, 2.0), coord(3.0, 3.0), coord(4.0, 4.0)],
        );
        // len 4 -> index 2
        assert_eq!(street.center(), Some(GeoPoint::new(3.0, 3.0)));
    }

    #[test]
    fn test_center_single_point() {
        let street = Street::new("Тупик", vec![coord(59.9, 30.3)]);
        assert_eq!(street.center(), Some(GeoPoint::new(59.9, 30.3)));
    }

    #[test]
    fn test_merge_keeps_discovery_order() {
        let mut a = Street::new("Садовая улица", vec![coord(1.0, 1.0)]);
        let b = Street::new("Садовая улица", vec![coord(5.0, 5.0), coord(6.0, 6.0)]);
        a.merge(b);
        assert_eq!(
            a.coordinates,
            vec![coord(1.0, 1.0), coord(5.0, 5.0), coord(6.0, 6.0)]
        );
    }
}
