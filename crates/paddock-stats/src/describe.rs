//! Per-factor descriptive statistics.
//!
//! Aggregates are computed with polars lazy expressions: `std(1)` for the
//! sample standard deviation and `QuantileMethod::Linear` for the quartiles,
//! matching the conventions the dashboard pipeline was validated against.

use crate::error::StatsError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one factor column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    /// Factor column name.
    pub factor: String,
    /// Number of non-null observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator); 0 for constant columns.
    pub std_dev: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
    /// 25th percentile (linear interpolation).
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// 75th percentile (linear interpolation).
    pub q75: f64,
}

/// Compute descriptive statistics for each factor column of a score frame.
pub fn describe_factors(
    df: &DataFrame,
    factor_columns: &[String],
) -> Result<Vec<FactorSummary>, StatsError> {
    if df.height() == 0 {
        return Err(StatsError::EmptyInput(
            "score frame has no rows".to_string(),
        ));
    }

    let mut summaries = Vec::with_capacity(factor_columns.len());

    for factor in factor_columns {
        if df.column(factor.as_str()).is_err() {
            return Err(StatsError::MissingColumn(factor.clone()));
        }

        let out = df
            .clone()
            .lazy()
            .select([
                col(factor.as_str()).count().alias("count"),
                col(factor.as_str()).mean().alias("mean"),
                col(factor.as_str()).std(1).alias("std"),
                col(factor.as_str()).min().alias("min"),
                col(factor.as_str()).max().alias("max"),
                col(factor.as_str())
                    .quantile(lit(0.25), QuantileMethod::Linear)
                    .alias("q25"),
                col(factor.as_str())
                    .quantile(lit(0.50), QuantileMethod::Linear)
                    .alias("median"),
                col(factor.as_str())
                    .quantile(lit(0.75), QuantileMethod::Linear)
                    .alias("q75"),
            ])
            .collect()?;

        let scalar = |name: &str| -> Result<f64, StatsError> {
            out.column(name)?
                .cast(&DataType::Float64)?
                .f64()?
                .get(0)
                .ok_or_else(|| {
                    StatsError::EmptyInput(format!("no observations for factor {factor}"))
                })
        };

        let count = out
            .column("count")?
            .cast(&DataType::UInt32)?
            .u32()?
            .get(0)
            .unwrap_or(0) as usize;

        if count == 0 {
            return Err(StatsError::EmptyInput(format!(
                "no observations for factor {factor}"
            )));
        }

        summaries.push(FactorSummary {
            factor: factor.clone(),
            count,
            mean: scalar("mean")?,
            // Single observation or constant column: spread is 0, not a fault.
            std_dev: out.column("std")?.f64()?.get(0).unwrap_or(0.0),
            min: scalar("min")?,
            max: scalar("max")?,
            q25: scalar("q25")?,
            median: scalar("median")?,
            q75: scalar("q75")?,
        });
    }

    Ok(summaries)
}
