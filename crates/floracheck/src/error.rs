//! Error types for the floracheck library.
//!
//! Only structural problems and infrastructure failures are errors. Anything a
//! curator should investigate (missing taxa, field mismatches, stale
//! exceptions) is recorded in the discrepancy log instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for floracheck operations.
#[derive(Debug, Error)]
pub enum FloracheckError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed row in a checklist or snapshot file.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// A taxon with this canonical name is already registered.
    #[error("Duplicate taxon name: {0}")]
    DuplicateTaxon(String),

    /// A synonym or exception references a taxon that is not registered.
    #[error("Unknown taxon: {0}")]
    UnknownTaxon(String),

    /// Two exception records resolve to the same key.
    #[error("Duplicate exception for '{taxon}' in section '{section}': {rule}")]
    DuplicateException {
        taxon: String,
        section: String,
        rule: String,
    },

    /// Exceptions file has an unusable shape.
    #[error("Invalid exceptions file: {0}")]
    Config(String),

    /// No profile is registered for this source id.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// A source adapter could not produce a snapshot.
    #[error("Source '{source_id}' unavailable: {message}")]
    Source { source_id: String, message: String },

    /// Failure writing an update set back to the checklist.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl FloracheckError {
    /// Structural errors mean the local data itself is inconsistent.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FloracheckError::DuplicateTaxon(_)
                | FloracheckError::UnknownTaxon(_)
                | FloracheckError::DuplicateException { .. }
        )
    }
}

/// Result type alias for floracheck operations.
pub type Result<T> = std::result::Result<T, FloracheckError>;
