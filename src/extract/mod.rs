//! Mention extraction, intersection resolution and candidate aggregation.

mod aggregate;
mod intersection;
mod locator;
mod matcher;

pub use aggregate::CandidateAggregator;
pub use intersection::{IntersectionResolver, Intersector, SegmentSweep};
pub use locator::{Analysis, Location, Locator};
pub use matcher::{MatchKind, MatchResult, MentionMatcher, PreparedText, StreetMention};
