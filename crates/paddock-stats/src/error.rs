//! Error types for statistics operations.

use thiserror::Error;

/// Errors that can occur while computing statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The input frame has no rows to aggregate
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A required column is absent from the input frame
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
