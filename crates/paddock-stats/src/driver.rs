//! Per-driver aggregation.
//!
//! Groups score rows by `driver_number` and averages each factor across the
//! races a driver appears in, then measures the spread of those per-driver
//! means across the driver population. That spread is the between-driver
//! signal, distinct from the per-race noise inside one driver's rows.

use crate::error::StatsError;
use crate::moments::sample_std;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Driver identifier column expected in score frames.
const DRIVER_COLUMN: &str = "driver_number";

/// Per-driver mean of each factor across all races the driver appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAggregate {
    /// Car number of the driver.
    pub driver_number: u32,
    /// Number of races aggregated.
    pub races: usize,
    /// Mean factor scores, aligned with the requested factor columns.
    pub means: Vec<f64>,
}

/// Spread of per-driver means for one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSpread {
    /// Factor column name.
    pub factor: String,
    /// Sample standard deviation of the per-driver means; 0 when fewer than
    /// two drivers are present.
    pub between_driver_std: f64,
}

/// Group a score frame by driver and average each factor column.
///
/// Results are sorted by driver number, so the output is independent of row
/// order in the input frame.
pub fn driver_aggregates(
    df: &DataFrame,
    factor_columns: &[String],
) -> Result<Vec<DriverAggregate>, StatsError> {
    if df.height() == 0 {
        return Err(StatsError::EmptyInput(
            "score frame has no rows".to_string(),
        ));
    }
    if df.column(DRIVER_COLUMN).is_err() {
        return Err(StatsError::MissingColumn(DRIVER_COLUMN.to_string()));
    }
    for factor in factor_columns {
        if df.column(factor.as_str()).is_err() {
            return Err(StatsError::MissingColumn(factor.clone()));
        }
    }

    let mut aggs: Vec<Expr> = vec![col(DRIVER_COLUMN).count().alias("race_count")];
    for factor in factor_columns {
        aggs.push(col(factor.as_str()).mean());
    }

    let out = df
        .clone()
        .lazy()
        .group_by([col(DRIVER_COLUMN)])
        .agg(aggs)
        .sort([DRIVER_COLUMN], Default::default())
        .collect()?;

    let drivers = out.column(DRIVER_COLUMN)?.u32()?;
    let race_counts = out.column("race_count")?.cast(&DataType::UInt32)?;
    let race_counts = race_counts.u32()?;

    let mut factor_series = Vec::with_capacity(factor_columns.len());
    for factor in factor_columns {
        factor_series.push(out.column(factor.as_str())?.f64()?.clone());
    }

    let mut aggregates = Vec::with_capacity(out.height());
    for i in 0..out.height() {
        let driver_number = drivers.get(i).ok_or_else(|| {
            StatsError::EmptyInput("null driver_number in grouped frame".to_string())
        })?;
        let races = race_counts.get(i).unwrap_or(0) as usize;
        let means = factor_series
            .iter()
            .map(|s| s.get(i).unwrap_or(f64::NAN))
            .collect();

        aggregates.push(DriverAggregate {
            driver_number,
            races,
            means,
        });
    }

    Ok(aggregates)
}

/// Standard deviation of the per-driver means for each factor.
pub fn between_driver_spread(
    aggregates: &[DriverAggregate],
    factor_columns: &[String],
) -> Vec<FactorSpread> {
    factor_columns
        .iter()
        .enumerate()
        .map(|(i, factor)| {
            let means: Vec<f64> = aggregates.iter().map(|a| a.means[i]).collect();
            FactorSpread {
                factor: factor.clone(),
                between_driver_std: sample_std(&means),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture_frame() -> DataFrame {
        // Driver 1 runs three races, driver 44 two.
        DataFrame::new(vec![
            Series::new(DRIVER_COLUMN.into(), vec![44u32, 1, 1, 44, 1]).into(),
            Series::new(
                "race".into(),
                vec!["monza", "monza", "monaco", "monaco", "spa"],
            )
            .into(),
            Series::new("pace_score".into(), vec![0.5, 1.0, 2.0, 0.7, 3.0]).into(),
            Series::new("consistency_score".into(), vec![0.2, 0.4, 0.4, 0.0, 0.4]).into(),
        ])
        .unwrap()
    }

    fn factor_columns() -> Vec<String> {
        vec!["pace_score".to_string(), "consistency_score".to_string()]
    }

    #[test]
    fn test_grouping_matches_arithmetic_mean() {
        let aggregates = driver_aggregates(&fixture_frame(), &factor_columns()).unwrap();

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].driver_number, 1);
        assert_eq!(aggregates[0].races, 3);
        assert_relative_eq!(aggregates[0].means[0], 2.0); // (1 + 2 + 3) / 3
        assert_relative_eq!(aggregates[0].means[1], 0.4);

        assert_eq!(aggregates[1].driver_number, 44);
        assert_eq!(aggregates[1].races, 2);
        assert_relative_eq!(aggregates[1].means[0], 0.6); // (0.5 + 0.7) / 2
        assert_relative_eq!(aggregates[1].means[1], 0.1);
    }

    #[test]
    fn test_row_order_independence() {
        let df = fixture_frame();
        let reversed = df.reverse();

        let a = driver_aggregates(&df, &factor_columns()).unwrap();
        let b = driver_aggregates(&reversed, &factor_columns()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_between_driver_spread() {
        let aggregates = driver_aggregates(&fixture_frame(), &factor_columns()).unwrap();
        let spreads = between_driver_spread(&aggregates, &factor_columns());

        // Per-driver pace means are [2.0, 0.6]; sample std of two points.
        let expected = ((2.0_f64 - 1.3).powi(2) + (0.6_f64 - 1.3).powi(2)).sqrt();
        assert_relative_eq!(spreads[0].between_driver_std, expected, epsilon = 1e-12);
        assert_eq!(spreads[0].factor, "pace_score");
    }

    #[test]
    fn test_single_driver_spread_is_zero() {
        let aggregates = vec![DriverAggregate {
            driver_number: 1,
            races: 2,
            means: vec![1.5],
        }];
        let spreads = between_driver_spread(&aggregates, &["pace_score".to_string()]);
        assert_relative_eq!(spreads[0].between_driver_std, 0.0);
    }

    #[test]
    fn test_missing_driver_column() {
        let df = DataFrame::new(vec![
            Series::new("pace_score".into(), vec![1.0, 2.0]).into(),
        ])
        .unwrap();
        let err = driver_aggregates(&df, &["pace_score".to_string()]).unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn(_)));
    }
}
