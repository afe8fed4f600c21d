//! Ordinary least-squares linear model.
//!
//! Fits finishing position as a linear combination of factor scores plus an
//! intercept. The normal equations are assembled explicitly and solved with
//! Gaussian elimination under partial pivoting; at four or five factors the
//! system is tiny and a direct solve is exact enough.

use crate::error::ModelError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsModel {
    /// Intercept term.
    pub intercept: f64,
    /// One coefficient per factor column.
    pub coefficients: Vec<f64>,
}

impl OlsModel {
    /// Fit by ordinary least squares.
    ///
    /// # Arguments
    /// * `x` - Design matrix (N x K), one row per record
    /// * `y` - Target vector (N), finishing positions
    ///
    /// Requires at least K + 2 records so the residual has a degree of
    /// freedom left.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, ModelError> {
        let (n, k) = x.dim();

        if y.len() != n {
            return Err(ModelError::DimensionMismatch(format!(
                "design matrix has {} rows but target has {}",
                n,
                y.len()
            )));
        }
        if n < k + 2 {
            return Err(ModelError::InsufficientData {
                required: k + 2,
                actual: n,
            });
        }

        // Augment with the intercept column, then form A = X~'X~, b = X~'y.
        let p = k + 1;
        let mut a = Array2::<f64>::zeros((p, p));
        let mut b = Array1::<f64>::zeros(p);

        for row in 0..n {
            let mut augmented = Vec::with_capacity(p);
            augmented.push(1.0);
            for col in 0..k {
                augmented.push(x[[row, col]]);
            }

            for i in 0..p {
                b[i] += augmented[i] * y[row];
                for j in 0..p {
                    a[[i, j]] += augmented[i] * augmented[j];
                }
            }
        }

        let beta = solve_linear_system(a, b)?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
        })
    }

    /// Predict targets for a design matrix.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let (n, k) = x.dim();
        if k != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch(format!(
                "model has {} coefficients but design matrix has {} columns",
                self.coefficients.len(),
                k
            )));
        }

        let mut predictions = Array1::<f64>::zeros(n);
        for row in 0..n {
            let mut value = self.intercept;
            for col in 0..k {
                value += self.coefficients[col] * x[[row, col]];
            }
            predictions[row] = value;
        }

        Ok(predictions)
    }

    /// Number of factor coefficients.
    pub fn n_factors(&self) -> usize {
        self.coefficients.len()
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
fn solve_linear_system(
    mut a: Array2<f64>,
    mut b: Array1<f64>,
) -> Result<Array1<f64>, ModelError> {
    let p = b.len();
    const PIVOT_EPSILON: f64 = 1e-12;

    for col in 0..p {
        // Pick the largest remaining pivot in this column.
        let mut pivot_row = col;
        let mut pivot_value = a[[col, col]].abs();
        for row in (col + 1)..p {
            if a[[row, col]].abs() > pivot_value {
                pivot_row = row;
                pivot_value = a[[row, col]].abs();
            }
        }

        if pivot_value < PIVOT_EPSILON {
            return Err(ModelError::Singular(
                "factor columns are collinear or constant".to_string(),
            ));
        }

        if pivot_row != col {
            for j in 0..p {
                let tmp = a[[col, j]];
                a[[col, j]] = a[[pivot_row, j]];
                a[[pivot_row, j]] = tmp;
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..p {
            let factor = a[[row, col]] / a[[col, col]];
            for j in col..p {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = Array1::<f64>::zeros(p);
    for row in (0..p).rev() {
        let mut value = b[row];
        for col in (row + 1)..p {
            value -= a[[row, col]] * x[col];
        }
        x[row] = value / a[[row, row]];
    }

    Ok(x)
}
