//! Core data models for the locator.

pub mod candidate;
pub mod gazetteer;
pub mod point;

pub use candidate::{CandidateSource, CoordinateCandidate};
pub use gazetteer::{MetroStation, Street};
pub use point::GeoPoint;
