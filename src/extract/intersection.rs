//! Street intersection geometry.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString};
use hashbrown::HashSet;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use super::matcher::PreparedText;
use crate::models::{GeoPoint, Street};
use crate::normalize::NameNormalizer;

/// Crossing points of two polylines.
pub trait Intersector: Send + Sync {
    /// Points where `a` and `b` cross, in a deterministic order.
    fn intersect(&self, a: &LineString<f64>, b: &LineString<f64>) -> Vec<Coord<f64>>;
}

/// Segment of the second polyline, indexed for envelope queries
struct IndexedSegment {
    index: usize,
    line: Line<f64>,
    envelope: AABB<[f64; 2]>,
}

impl IndexedSegment {
    fn new(index: usize, line: Line<f64>) -> Self {
        Self {
            index,
            line,
            envelope: segment_envelope(&line),
        }
    }
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn segment_envelope(line: &Line<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([line.start.x, line.start.y], [line.end.x, line.end.y])
}

/// Pairwise segment sweep pruned by an R-tree over the second polyline.
///
/// Points are ordered by segment index in `a`, then segment index in `b`;
/// exact duplicates (a crossing at a shared vertex) are reported once.
/// Collinear overlaps contribute no point.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentSweep;

impl Intersector for SegmentSweep {
    fn intersect(&self, a: &LineString<f64>, b: &LineString<f64>) -> Vec<Coord<f64>> {
        if a.0.len() < 2 || b.0.len() < 2 {
            return Vec::new();
        }

        let segments: Vec<IndexedSegment> = b
            .lines()
            .enumerate()
            .map(|(i, line)| IndexedSegment::new(i, line))
            .collect();
        let tree = RTree::bulk_load(segments);

        let mut hits: Vec<(usize, usize, Coord<f64>)> = Vec::new();
        for (i, line) in a.lines().enumerate() {
            let envelope = segment_envelope(&line);
            for other in tree.locate_in_envelope_intersecting(&envelope) {
                if let Some(LineIntersection::SinglePoint { intersection, .. }) =
                    line_intersection(line, other.line)
                {
                    hits.push((i, other.index, intersection));
                }
            }
        }
        hits.sort_by_key(|&(i, j, _)| (i, j));

        let mut points: Vec<Coord<f64>> = Vec::with_capacity(hits.len());
        for (_, _, point) in hits {
            if !points.contains(&point) {
                points.push(point);
            }
        }
        points
    }
}

/// Computes intersection candidates for co-mentioned streets.
pub struct IntersectionResolver {
    keywords: Vec<String>,
    intersector: Box<dyn Intersector>,
}

impl IntersectionResolver {
    /// `keywords` are raw words; they are normalized with the gazetteer's
    /// normalizer so they compare against lemmatized text.
    pub fn new(keywords: &[String], normalizer: &NameNormalizer) -> Self {
        Self::with_intersector(keywords, normalizer, Box::new(SegmentSweep))
    }

    pub fn with_intersector(
        keywords: &[String],
        normalizer: &NameNormalizer,
        intersector: Box<dyn Intersector>,
    ) -> Self {
        let mut seen = HashSet::new();
        let keywords = keywords
            .iter()
            .map(|k| normalizer.normalize(k))
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        Self {
            keywords,
            intersector,
        }
    }

    /// True if any intersection keyword occurs anywhere in the text.
    pub fn mentions_intersection(&self, text: &PreparedText) -> bool {
        self.keywords.iter().any(|k| text.contains_phrase(k))
    }

    /// Crossing point of two streets, if the text talks about an
    /// intersection and the polylines actually cross.
    ///
    /// With several crossings the first one in enumeration order wins.
    pub fn resolve(&self, a: &Street, b: &Street, text: &PreparedText) -> Option<GeoPoint> {
        if !self.mentions_intersection(text) {
            return None;
        }
        self.crossing(a, b)
    }

    /// Geometric part of [`resolve`](Self::resolve), without the keyword check.
    pub fn crossing(&self, a: &Street, b: &Street) -> Option<GeoPoint> {
        let points = self.intersector.intersect(&a.line_string(), &b.line_string());
        if points.len() > 1 {
            debug!(
                "'{}' and '{}' cross {} times, using the first crossing",
                a.name,
                b.name,
                points.len()
            );
        }
        points.first().copied().map(GeoPoint::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> LineString<f64> {
        LineString::new(points.iter().map(|&(x, y)| Coord { x, y }).collect())
    }

    fn street(name: &str, points: &[(f64, f64)]) -> Street {
        Street::new(name, line(points).0)
    }

    fn keywords() -> Vec<String> {
        vec!["пересечение".to_string(), "перекрёсток".to_string(), "перекресток".to_string()]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_crossing() {
        let points = SegmentSweep.intersect(
            &line(&[(0.0, 1.0), (2.0, 1.0)]),
            &line(&[(1.0, 0.0), (1.0, 2.0)]),
        );
        assert_eq!(points.len(), 1);
        assert!(approx(points[0].x, 1.0) && approx(points[0].y, 1.0));
    }

    #[test]
    fn test_multiple_crossings_ordered_along_first_line() {
        // zig-zag crossing a horizontal line three times
        let zigzag = line(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.0), (3.0, 2.0)]);
        let horizontal = line(&[(3.0, 1.0), (-1.0, 1.0)]);
        let points = SegmentSweep.intersect(&zigzag, &horizontal);
        assert_eq!(points.len(), 3);
        assert!(approx(points[0].x, 0.5));
        assert!(approx(points[1].x, 1.5));
        assert!(approx(points[2].x, 2.5));
    }

    #[test]
    fn test_shared_vertex_reported_once() {
        let a = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let b = line(&[(0.0, 2.0), (1.0, 1.0), (2.0, 0.0)]);
        let points = SegmentSweep.intersect(&a, &b);
        assert_eq!(points, vec![Coord { x: 1.0, y: 1.0 }]);
    }

    #[test]
    fn test_parallel_and_degenerate() {
        let a = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let b = line(&[(0.0, 1.0), (2.0, 1.0)]);
        assert!(SegmentSweep.intersect(&a, &b).is_empty());
        assert!(SegmentSweep.intersect(&a, &line(&[(1.0, 0.0)])).is_empty());
    }

    #[test]
    fn test_collinear_overlap_gives_no_point() {
        let a = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let b = line(&[(1.0, 0.0), (3.0, 0.0)]);
        assert!(SegmentSweep.intersect(&a, &b).is_empty());
    }

    #[test]
    fn test_resolve_requires_keyword() {
        let normalizer = NameNormalizer::default();
        let resolver = IntersectionResolver::new(&keywords(), &normalizer);
        let nevsky = street("Невский проспект", &[(30.30, 59.93), (30.40, 59.93)]);
        let liteyny = street("Литейный проспект", &[(30.348, 59.90), (30.348, 59.96)]);

        let with_keyword = PreparedText::new("на перекрёстке Невского и Литейного", &normalizer);
        let point = resolver.resolve(&nevsky, &liteyny, &with_keyword).unwrap();
        assert!(approx(point.lat, 59.93));
        assert!(approx(point.lon, 30.348));

        // keyword anywhere in the text, not next to the names
        let far = PreparedText::new("Невский и Литейный, авария у пересечения", &normalizer);
        assert!(resolver.resolve(&nevsky, &liteyny, &far).is_some());

        let without = PreparedText::new("Невский и Литейный", &normalizer);
        assert!(resolver.resolve(&nevsky, &liteyny, &without).is_none());
    }

    #[test]
    fn test_resolve_non_crossing_streets() {
        let normalizer = NameNormalizer::default();
        let resolver = IntersectionResolver::new(&keywords(), &normalizer);
        let nevsky = street("Невский проспект", &[(30.30, 59.93), (30.40, 59.93)]);
        let sadovaya = street("Садовая улица", &[(30.30, 59.92), (30.40, 59.92)]);
        let text = PreparedText::new("пересечение Невского и Садовой", &normalizer);
        assert!(resolver.resolve(&nevsky, &sadovaya, &text).is_none());
    }

    #[test]
    fn test_keyword_variants_deduplicated() {
        let normalizer = NameNormalizer::default();
        let resolver = IntersectionResolver::new(&keywords(), &normalizer);
        assert_eq!(resolver.keywords.len(), 2);
    }
}
