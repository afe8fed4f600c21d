//! Design matrix extraction.
//!
//! Converts a score frame into the ndarray inputs the model works on. Rows
//! without a finishing position cannot be fitted or scored and are dropped
//! here, with the count surfaced so the caller can report it.

use crate::error::ModelError;
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Model-ready view of a score frame.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Design matrix (N x K), one row per record with a finishing position.
    pub x: Array2<f64>,
    /// Finishing positions (N).
    pub y: Array1<f64>,
    /// Race identifier per row, for grouped folds.
    pub races: Vec<String>,
    /// Rows dropped for lacking a finishing position.
    pub dropped: usize,
}

impl Dataset {
    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the dataset has no usable records.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Slice the dataset by record indices (fold train or test set).
    pub fn subset(&self, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
        let k = self.x.ncols();
        let mut x = Array2::<f64>::zeros((indices.len(), k));
        let mut y = Array1::<f64>::zeros(indices.len());

        for (row, &i) in indices.iter().enumerate() {
            y[row] = self.y[i];
            for col in 0..k {
                x[[row, col]] = self.x[[i, col]];
            }
        }

        (x, y)
    }
}

/// Extract a [`Dataset`] from a score frame.
///
/// The frame must carry `race`, `finish_position`, and the factor columns.
pub fn dataset_from_frame(
    df: &DataFrame,
    factor_columns: &[String],
) -> Result<Dataset, ModelError> {
    let races = df
        .column("race")
        .map_err(|_| ModelError::MissingColumn("race".to_string()))?
        .str()?;
    let finishes = df
        .column("finish_position")
        .map_err(|_| ModelError::MissingColumn("finish_position".to_string()))?
        .f64()?;

    let mut factor_series = Vec::with_capacity(factor_columns.len());
    for factor in factor_columns {
        let series = df
            .column(factor.as_str())
            .map_err(|_| ModelError::MissingColumn(factor.clone()))?
            .f64()?;
        factor_series.push(series.clone());
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut y_values: Vec<f64> = Vec::new();
    let mut race_values: Vec<String> = Vec::new();
    let mut dropped = 0;

    for i in 0..df.height() {
        let Some(finish) = finishes.get(i) else {
            dropped += 1;
            continue;
        };

        let mut row = Vec::with_capacity(factor_columns.len());
        let mut complete = true;
        for series in &factor_series {
            match series.get(i) {
                Some(v) => row.push(v),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            dropped += 1;
            continue;
        }

        rows.push(row);
        y_values.push(finish);
        race_values.push(races.get(i).unwrap_or("").to_string());
    }

    if rows.is_empty() {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let k = factor_columns.len();
    let mut x = Array2::<f64>::zeros((rows.len(), k));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            x[[i, j]] = *value;
        }
    }

    Ok(Dataset {
        x,
        y: Array1::from_vec(y_values),
        races: race_values,
        dropped,
    })
}
