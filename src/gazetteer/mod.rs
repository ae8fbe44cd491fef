//! Static street and metro gazetteer.
//!
//! Loaded once at startup from a JSON document of the form
//! `{"metro_stations": {name: {name, lat, lon}}, "streets": {name: {name, coordinates}}}`
//! and shared read-only afterwards.

mod store;

pub use store::GazetteerStore;
