//! Presentation rescaling and empirical percentiles.
//!
//! Raw factor scores are z-score-like and unbounded; the dashboard shows a
//! bounded 0-100 value plus the percentile of each score within the full
//! population for that factor. The rescale is monotonic in the raw score,
//! and percentiles use midranks so ties share a value.

use crate::error::StatsError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Sentinel for degenerate populations: a zero-range column rescales to the
/// middle of the presentation band, and a single-element population sits at
/// the 50th percentile.
pub const DEGENERATE_MIDPOINT: f64 = 50.0;

/// One factor score rescaled for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFactorScore {
    /// Car number of the driver.
    pub driver_number: u32,
    /// Race identifier.
    pub race: String,
    /// Factor column name.
    pub factor: String,
    /// Raw score the rescale was derived from.
    pub raw: f64,
    /// Bounded presentation value in 0-100.
    pub scaled: f64,
    /// Empirical percentile (midrank) in 0-100.
    pub percentile: f64,
}

/// Rescale values to 0-100 by the population minimum and maximum.
///
/// Monotonic in the input. A zero-range population maps every value to
/// [`DEGENERATE_MIDPOINT`].
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| {
            if range > 0.0 {
                (v - min) / range * 100.0
            } else {
                DEGENERATE_MIDPOINT
            }
        })
        .collect()
}

/// Empirical midrank percentile of each value within the slice.
///
/// `100 * (count_below + count_equal / 2) / n`, so a single-element
/// population reports 50 and ties share a percentile.
pub fn midrank_percentiles(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    values
        .iter()
        .map(|v| {
            let below = values.iter().filter(|w| **w < *v).count() as f64;
            let equal = values.iter().filter(|w| **w == *v).count() as f64;
            100.0 * (below + equal / 2.0) / n
        })
        .collect()
}

/// Normalize every factor column of a score frame.
///
/// The frame must carry `driver_number` and `race` identifier columns.
/// Output is grouped by factor, preserving row order within each factor.
pub fn normalized_scores(
    df: &DataFrame,
    factor_columns: &[String],
) -> Result<Vec<NormalizedFactorScore>, StatsError> {
    if df.height() == 0 {
        return Err(StatsError::EmptyInput(
            "score frame has no rows".to_string(),
        ));
    }

    let drivers = df
        .column("driver_number")
        .map_err(|_| StatsError::MissingColumn("driver_number".to_string()))?
        .u32()?;
    let races = df
        .column("race")
        .map_err(|_| StatsError::MissingColumn("race".to_string()))?
        .str()?;

    let mut scores = Vec::new();

    for factor in factor_columns {
        let raw = df
            .column(factor.as_str())
            .map_err(|_| StatsError::MissingColumn(factor.clone()))?
            .f64()?;
        let raw: Vec<f64> = raw.into_no_null_iter().collect();
        if raw.len() != df.height() {
            return Err(StatsError::EmptyInput(format!(
                "factor {factor} contains nulls; incomplete rows must be dropped at load time"
            )));
        }

        let scaled = min_max_scale(&raw);
        let percentiles = midrank_percentiles(&raw);

        for i in 0..raw.len() {
            scores.push(NormalizedFactorScore {
                driver_number: drivers.get(i).unwrap_or(0),
                race: races.get(i).unwrap_or("").to_string(),
                factor: factor.clone(),
                raw: raw[i],
                scaled: scaled[i],
                percentile: percentiles[i],
            });
        }
    }

    Ok(scores)
}
