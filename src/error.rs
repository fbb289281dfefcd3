//! Error types for the cocompare library.

use thiserror::Error;

/// Result type for cocompare operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Error types that can occur while loading or evaluating annotations.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while reading or writing CSV data.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Malformed annotation record.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Missing required field in an annotation source.
    #[error("Missing field: {0}")]
    MissingField(String),
}
