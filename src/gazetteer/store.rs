//! Normalized-key lookup tables for streets and metro stations.

use flate2::read::GzDecoder;
use geo::Coord;
use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::CoordinateOrder;
use crate::error::{Error, Result};
use crate::models::{MetroStation, Street};
use crate::normalize::NameNormalizer;

const METRO_TABLE: &str = "metro_stations";
const STREET_TABLE: &str = "streets";

#[derive(Debug, Deserialize)]
struct RawMetroStation {
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawStreet {
    name: String,
    coordinates: Vec<[f64; 2]>,
}

/// Read-only gazetteer built once at startup.
///
/// Keys are produced by the store's own [`NameNormalizer`]; lookups run the
/// query through the same normalizer and then do an exact-key lookup.
#[derive(Debug)]
pub struct GazetteerStore {
    normalizer: NameNormalizer,
    streets: Vec<(String, Street)>,
    street_index: HashMap<String, usize>,
    metros: Vec<(String, MetroStation)>,
    metro_index: HashMap<String, usize>,
}

impl GazetteerStore {
    /// Empty store, filled with [`insert_street`](Self::insert_street) and
    /// [`insert_metro`](Self::insert_metro).
    pub fn new(normalizer: NameNormalizer) -> Self {
        Self {
            normalizer,
            streets: Vec::new(),
            street_index: HashMap::new(),
            metros: Vec::new(),
            metro_index: HashMap::new(),
        }
    }

    /// Load a gazetteer JSON file (optionally `.gz`).
    pub fn load<P: AsRef<Path>>(
        path: P,
        normalizer: NameNormalizer,
        order: CoordinateOrder,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        info!("Loading gazetteer from {}", path.display());

        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let document: Value =
            serde_json::from_reader(BufReader::new(reader)).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_document(document, normalizer, order)
    }

    /// Build from an already parsed document.
    pub fn from_document(
        document: Value,
        normalizer: NameNormalizer,
        order: CoordinateOrder,
    ) -> Result<Self> {
        let Value::Object(mut root) = document else {
            return Err(Error::InvalidDocument(
                "top-level value is not an object".to_string(),
            ));
        };

        let mut store = Self::new(normalizer);

        match take_table(&mut root, METRO_TABLE)? {
            Some(table) => {
                for (key, value) in table {
                    let raw: RawMetroStation = serde_json::from_value(value)
                        .map_err(|e| Error::malformed(METRO_TABLE, &key, e.to_string()))?;
                    store.insert_metro(&key, MetroStation::new(raw.name, raw.lat, raw.lon));
                }
            }
            None => warn!("Gazetteer has no '{}' table", METRO_TABLE),
        }

        match take_table(&mut root, STREET_TABLE)? {
            Some(table) => {
                for (key, value) in table {
                    let raw: RawStreet = serde_json::from_value(value)
                        .map_err(|e| Error::malformed(STREET_TABLE, &key, e.to_string()))?;
                    if raw.coordinates.is_empty() {
                        return Err(Error::malformed(STREET_TABLE, &key, "empty coordinates"));
                    }
                    let coordinates = raw
                        .coordinates
                        .into_iter()
                        .map(|pair| {
                            let (lat, lon) = order.lat_lon(pair);
                            Coord { x: lon, y: lat }
                        })
                        .collect();
                    store.insert_street(&key, Street::new(raw.name, coordinates));
                }
            }
            None => warn!("Gazetteer has no '{}' table", STREET_TABLE),
        }

        info!(
            "Gazetteer ready: {} streets, {} metro stations",
            store.streets.len(),
            store.metros.len()
        );
        Ok(store)
    }

    /// Add a street under the normalized form of `raw_name`.
    ///
    /// A street whose key already exists has its points appended to the
    /// existing entry. Names that normalize to nothing are skipped, as are
    /// streets without coordinates.
    pub fn insert_street(&mut self, raw_name: &str, street: Street) {
        if street.coordinates.is_empty() {
            warn!("Skipping street '{}' without coordinates", raw_name);
            return;
        }
        let key = self.normalizer.normalize(raw_name);
        if key.is_empty() {
            warn!("Skipping street '{}': name normalizes to nothing", raw_name);
            return;
        }

        match self.street_index.get(&key) {
            Some(&idx) => {
                debug!("Merging street '{}' into '{}'", raw_name, key);
                self.streets[idx].1.merge(street);
            }
            None => {
                self.street_index.insert(key.clone(), self.streets.len());
                self.streets.push((key, street));
            }
        }
    }

    /// Add a metro station; a station with the same key is replaced.
    pub fn insert_metro(&mut self, raw_name: &str, station: MetroStation) {
        let key = self.normalizer.normalize(raw_name);
        if key.is_empty() {
            warn!("Skipping metro station '{}': name normalizes to nothing", raw_name);
            return;
        }

        match self.metro_index.get(&key) {
            Some(&idx) => {
                debug!("Replacing metro station '{}'", key);
                self.metros[idx].1 = station;
            }
            None => {
                self.metro_index.insert(key.clone(), self.metros.len());
                self.metros.push((key, station));
            }
        }
    }

    pub fn find_street(&self, query: &str) -> Option<&Street> {
        self.street_by_key(&self.normalizer.normalize(query))
    }

    pub fn find_metro(&self, query: &str) -> Option<&MetroStation> {
        self.metro_by_key(&self.normalizer.normalize(query))
    }

    /// Lookup by an already normalized key.
    pub fn street_by_key(&self, key: &str) -> Option<&Street> {
        self.street_index.get(key).map(|&idx| &self.streets[idx].1)
    }

    pub fn metro_by_key(&self, key: &str) -> Option<&MetroStation> {
        self.metro_index.get(key).map(|&idx| &self.metros[idx].1)
    }

    /// Streets with their keys, in load order.
    pub fn streets(&self) -> impl Iterator<Item = (&str, &Street)> {
        self.streets.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Metro stations with their keys, in load order.
    pub fn metros(&self) -> impl Iterator<Item = (&str, &MetroStation)> {
        self.metros.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    pub fn metro_count(&self) -> usize {
        self.metros.len()
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }
}

/// Remove a top-level table; absent is fine, present-but-not-an-object is not.
fn take_table(root: &mut Map<String, Value>, table: &'static str) -> Result<Option<Map<String, Value>>> {
    match root.remove(table) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(Error::InvalidDocument(format!(
            "'{}' must be an object, found {}",
            table,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
