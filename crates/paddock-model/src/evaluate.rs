//! Cross-validated model evaluation.
//!
//! Every fold reports R² and MAE on its training partition and on the
//! held-out partition separately. The two are never averaged into one
//! number: a large in-sample/out-of-sample gap is the overfitting signal
//! this pipeline exists to surface, and it must survive into the report.

use crate::design::Dataset;
use crate::error::ModelError;
use crate::folds::{DEFAULT_K, Fold, k_fold, leave_one_race_out};
use crate::metrics::{mean_absolute_error, r_squared};
use crate::ols::OlsModel;
use serde::{Deserialize, Serialize};

/// Cross-validation regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CvRegime {
    /// Random record-level folds, reproducible via the seed.
    KFold {
        /// Number of folds.
        k: usize,
        /// Shuffle seed.
        seed: u64,
    },
    /// One fold per race; tests generalization across races.
    LeaveOneRaceOut,
}

impl std::fmt::Display for CvRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KFold { k, seed } => write!(f, "{k}-fold (seed {seed})"),
            Self::LeaveOneRaceOut => write!(f, "leave-one-race-out"),
        }
    }
}

/// A model fitted on one training partition, with metrics on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFitResult {
    /// Fold label.
    pub label: String,
    /// The fitted model.
    pub model: OlsModel,
    /// Records trained on.
    pub train_size: usize,
    /// Records held out.
    pub test_size: usize,
    /// R² on the training partition.
    pub train_r2: f64,
    /// R² on the held-out partition.
    pub test_r2: f64,
    /// MAE on the training partition.
    pub train_mae: f64,
    /// MAE on the held-out partition.
    pub test_mae: f64,
}

/// Aggregated cross-validation metrics for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationSummary {
    /// The regime evaluated.
    pub regime: CvRegime,
    /// Per-fold results.
    pub folds: Vec<ModelFitResult>,
    /// Mean training R² across folds.
    pub mean_train_r2: f64,
    /// Mean held-out R² across folds.
    pub mean_test_r2: f64,
    /// Mean training MAE across folds.
    pub mean_train_mae: f64,
    /// Mean held-out MAE across folds.
    pub mean_test_mae: f64,
}

impl CrossValidationSummary {
    fn from_folds(regime: CvRegime, folds: Vec<ModelFitResult>) -> Self {
        let n = folds.len() as f64;
        let mean = |f: fn(&ModelFitResult) -> f64| folds.iter().map(f).sum::<f64>() / n;

        Self {
            mean_train_r2: mean(|f| f.train_r2),
            mean_test_r2: mean(|f| f.test_r2),
            mean_train_mae: mean(|f| f.train_mae),
            mean_test_mae: mean(|f| f.test_mae),
            regime,
            folds,
        }
    }

    /// Gap between mean in-sample and out-of-sample R².
    pub fn generalization_gap(&self) -> f64 {
        self.mean_train_r2 - self.mean_test_r2
    }

    /// Whether the in-sample/out-of-sample gap exceeds `threshold`.
    pub fn is_overfit(&self, threshold: f64) -> bool {
        self.generalization_gap() > threshold
    }
}

/// Evaluate one fold: fit on the training indices, score both partitions.
fn evaluate_fold(dataset: &Dataset, fold: &Fold) -> Result<ModelFitResult, ModelError> {
    let (train_x, train_y) = dataset.subset(&fold.train);
    let (test_x, test_y) = dataset.subset(&fold.test);

    let model = OlsModel::fit(&train_x, &train_y)?;
    let train_pred = model.predict(&train_x)?;
    let test_pred = model.predict(&test_x)?;

    Ok(ModelFitResult {
        label: fold.label.clone(),
        train_size: fold.train.len(),
        test_size: fold.test.len(),
        train_r2: r_squared(&train_y, &train_pred),
        test_r2: r_squared(&test_y, &test_pred),
        train_mae: mean_absolute_error(&train_y, &train_pred),
        test_mae: mean_absolute_error(&test_y, &test_pred),
        model,
    })
}

/// Run seeded k-fold cross-validation.
pub fn evaluate_k_fold(
    dataset: &Dataset,
    k: usize,
    seed: u64,
) -> Result<CrossValidationSummary, ModelError> {
    let folds = k_fold(dataset.len(), k, seed)?;
    let results = folds
        .iter()
        .map(|fold| evaluate_fold(dataset, fold))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CrossValidationSummary::from_folds(
        CvRegime::KFold { k, seed },
        results,
    ))
}

/// Run k-fold with the default fold count.
pub fn evaluate_default_k_fold(
    dataset: &Dataset,
    seed: u64,
) -> Result<CrossValidationSummary, ModelError> {
    evaluate_k_fold(dataset, DEFAULT_K, seed)
}

/// Run leave-one-race-out cross-validation.
pub fn evaluate_leave_one_race_out(
    dataset: &Dataset,
) -> Result<CrossValidationSummary, ModelError> {
    let folds = leave_one_race_out(&dataset.races)?;
    let results = folds
        .iter()
        .map(|fold| evaluate_fold(dataset, fold))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CrossValidationSummary::from_folds(
        CvRegime::LeaveOneRaceOut,
        results,
    ))
}

/// Fit the full dataset once and report in-sample metrics.
pub fn in_sample_fit(dataset: &Dataset) -> Result<ModelFitResult, ModelError> {
    let model = OlsModel::fit(&dataset.x, &dataset.y)?;
    let predicted = model.predict(&dataset.x)?;

    Ok(ModelFitResult {
        label: "full sample".to_string(),
        train_size: dataset.len(),
        test_size: 0,
        train_r2: r_squared(&dataset.y, &predicted),
        test_r2: f64::NAN,
        train_mae: mean_absolute_error(&dataset.y, &predicted),
        test_mae: f64::NAN,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Synthetic dataset: y = 8 - 3 * x0 + x1 + small noise, two races.
    fn synthetic_dataset(n: usize) -> Dataset {
        let mut rng = StdRng::seed_from_u64(99);
        let mut x = Array2::<f64>::zeros((n, 2));
        let mut y = Array1::<f64>::zeros(n);
        let mut races = Vec::with_capacity(n);

        for i in 0..n {
            let x0: f64 = rng.gen_range(-2.0..2.0);
            let x1: f64 = rng.gen_range(-2.0..2.0);
            let noise: f64 = rng.gen_range(-0.05..0.05);
            x[[i, 0]] = x0;
            x[[i, 1]] = x1;
            y[i] = 8.0 - 3.0 * x0 + x1 + noise;
            races.push(if i % 2 == 0 { "monaco" } else { "monza" }.to_string());
        }

        Dataset {
            x,
            y,
            races,
            dropped: 0,
        }
    }

    #[test]
    fn test_k_fold_evaluation_on_clean_signal() {
        let dataset = synthetic_dataset(40);
        let summary = evaluate_k_fold(&dataset, 5, 42).unwrap();

        assert_eq!(summary.folds.len(), 5);
        assert!(summary.mean_train_r2 > 0.99);
        assert!(summary.mean_test_r2 > 0.95);
        assert!(summary.generalization_gap() < 0.05);
        assert!(!summary.is_overfit(0.1));
    }

    #[test]
    fn test_k_fold_reproducible() {
        let dataset = synthetic_dataset(30);
        let a = evaluate_k_fold(&dataset, 5, 42).unwrap();
        let b = evaluate_k_fold(&dataset, 5, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_leave_one_race_out_folds_match_races() {
        let dataset = synthetic_dataset(30);
        let summary = evaluate_leave_one_race_out(&dataset).unwrap();

        assert_eq!(summary.folds.len(), 2);
        assert_eq!(summary.folds[0].label, "monaco");
        assert_eq!(summary.folds[1].label, "monza");
        assert_eq!(summary.folds[0].test_size, 15);
        assert!(summary.mean_test_r2 > 0.9);
    }

    #[test]
    fn test_train_and_test_metrics_reported_distinctly() {
        let dataset = synthetic_dataset(25);
        let summary = evaluate_k_fold(&dataset, 5, 7).unwrap();

        for fold in &summary.folds {
            // Both sides present and finite; never collapsed into one value.
            assert!(fold.train_r2.is_finite());
            assert!(fold.test_r2.is_finite());
            assert!(fold.train_mae.is_finite());
            assert!(fold.test_mae.is_finite());
        }
        assert!(summary.generalization_gap().is_finite());
    }

    #[test]
    fn test_in_sample_fit_recovers_signal() {
        let dataset = synthetic_dataset(30);
        let fit = in_sample_fit(&dataset).unwrap();

        assert!(fit.train_r2 > 0.99);
        assert_relative_eq!(fit.model.coefficients[0], -3.0, epsilon = 0.1);
        assert_relative_eq!(fit.model.coefficients[1], 1.0, epsilon = 0.1);
        assert_relative_eq!(fit.model.intercept, 8.0, epsilon = 0.1);
    }
}
