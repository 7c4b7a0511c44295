//! Error types for the datasieve library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for datasieve operations.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The table handed to the engine is not well formed.
    #[error("Malformed table: {0}")]
    MalformedTable(#[from] MalformedTable),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SieveError {
    /// Returns true if the error describes a structurally invalid table.
    pub fn is_malformed_table(&self) -> bool {
        matches!(self, SieveError::MalformedTable(_))
    }
}

/// Structural problems that make a table unusable for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTable {
    /// A row's field count disagrees with the header.
    #[error("row {row} has {found} fields, header has {expected}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The same column name appears twice in the header.
    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),

    /// A configured column is not present in the header.
    #[error("column '{column}' referenced by {context} is not in the header")]
    UnknownColumn { column: String, context: String },
}

/// Result type alias for datasieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
