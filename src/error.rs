//! Error types for the gazetteer and lemmatizer loaders.
//!
//! Text analysis never fails; only loading reference data does.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The gazetteer file does not exist.
    #[error("Gazetteer file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have the gazetteer layout.
    #[error("Invalid gazetteer document: {0}")]
    InvalidDocument(String),

    /// A single entry is missing a field or carries the wrong shape.
    #[error("Malformed {table} entry '{key}': {reason}")]
    MalformedEntry {
        table: &'static str,
        key: String,
        reason: String,
    },

    #[error("Lemma dictionary error in {}: {reason}", path.display())]
    Dictionary { path: PathBuf, reason: String },
}

impl Error {
    pub fn malformed(table: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedEntry {
            table,
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn dictionary(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Dictionary {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
