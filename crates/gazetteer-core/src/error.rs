// crates/gazetteer-core/src/error.rs

//! Error types for catalogue I/O, import and configuration.
//!
//! Lookup outcomes such as "no match" or "unsupported country" are *not*
//! errors; they are reported through [`crate::place::ResultStatus`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    /// A file or entity that must exist could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The catalogue on disk was written with a different layout.
    #[error("Catalogue schema version {found} does not match expected {expected}")]
    SchemaMismatch { found: i32, expected: i32 },

    /// The catalogue loaded but holds fewer rows than the configured minimum.
    #[error("Catalogue holds {found} records, expected at least {minimum}")]
    TooFewRecords { found: usize, minimum: usize },

    #[error("Import cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;
