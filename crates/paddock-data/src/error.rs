//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Missing input
    #[error("Missing data in {source_name}: {reason}")]
    MissingData {
        /// Source file or table that was read
        source_name: String,
        /// Reason the data is missing
        reason: String,
    },

    /// A required column or field is absent
    #[error("Missing required field {field} in {source_name}")]
    MissingField {
        /// Source file or table that was read
        source_name: String,
        /// The absent column or field
        field: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document structure does not match the expected shape
    #[error("Invalid document {source_name}: {reason}")]
    InvalidDocument {
        /// Source file that was read
        source_name: String,
        /// What was wrong with the structure
        reason: String,
    },
}
