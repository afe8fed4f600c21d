//! Fit metrics.

use ndarray::Array1;

/// Coefficient of determination.
///
/// `1 - SS_res / SS_tot`. A zero-variance target makes the ratio undefined;
/// the sentinel 0.0 is returned instead of a numeric fault, since a model
/// cannot explain variance that does not exist.
pub fn r_squared(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return 0.0;
    }

    let mean = actual.sum() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot < 1e-12 {
        return 0.0;
    }

    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    1.0 - ss_res / ss_tot
}

/// Mean absolute error. Returns 0.0 for empty input.
pub fn mean_absolute_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return 0.0;
    }

    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}
