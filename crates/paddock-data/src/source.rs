//! Read-only access to independently-maintained aggregate sources.
//!
//! The consistency reporter audits two or more sources describing the same
//! factors. Each source sits behind [`AggregateSource`], so the relational
//! store can be swapped for any tabular source without touching the
//! reporter.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Per-factor aggregate statistics as reported by one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAggregate {
    /// Factor name.
    pub factor: String,
    /// Mean normalized value across all drivers.
    pub mean: f64,
    /// Minimum normalized value.
    pub min: f64,
    /// Maximum normalized value.
    pub max: f64,
    /// Mean percentile, when the source tracks percentiles.
    pub mean_percentile: Option<f64>,
    /// Number of underlying observations.
    pub count: usize,
}

/// A read-only source of per-factor aggregates and driver coverage.
pub trait AggregateSource {
    /// Short label for report output.
    fn source_name(&self) -> &str;

    /// Per-factor aggregates, sorted by factor name.
    fn factor_aggregates(&self) -> Result<Vec<FactorAggregate>>;

    /// All driver numbers the source covers, sorted ascending.
    fn driver_numbers(&self) -> Result<Vec<u32>>;
}
