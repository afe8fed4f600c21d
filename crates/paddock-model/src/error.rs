//! Error types for model fitting and evaluation.

use thiserror::Error;

/// Errors that can occur during model fitting and cross-validation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Not enough records for the requested operation
    #[error("Insufficient data: need at least {required} records, got {actual}")]
    InsufficientData {
        /// Minimum records required
        required: usize,
        /// Records actually available
        actual: usize,
    },

    /// Dimension mismatch between design matrix and target
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The normal equations are singular (collinear or constant factors)
    #[error("Singular design matrix: {0}")]
    Singular(String),

    /// Invalid fold configuration
    #[error("Invalid folds: {0}")]
    InvalidFolds(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A required column is absent from the input frame
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
