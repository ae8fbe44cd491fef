//! RTA Locator - estimates where a road traffic accident happened from the
//! free-form text of its report.
//!
//! Streets and metro stations are recognized against a precompiled
//! gazetteer, street crossings are resolved geometrically and all evidence
//! is averaged into one coordinate.

pub mod config;
pub mod error;
pub mod extract;
pub mod gazetteer;
pub mod models;
pub mod normalize;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::{Location, Locator};
pub use gazetteer::GazetteerStore;
pub use models::{CandidateSource, CoordinateCandidate, GeoPoint, MetroStation, Street};
