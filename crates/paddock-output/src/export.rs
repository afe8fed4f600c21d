//! Export of analysis results as CSV and JSON.

use paddock_model::CrossValidationSummary;
use paddock_stats::FactorSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One fold's metrics flattened for tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldMetricsRow {
    /// Cross-validation regime label.
    pub regime: String,
    /// Fold label.
    pub fold: String,
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

/// Flatten cross-validation results into exportable rows.
pub fn fold_metric_rows(summaries: &[CrossValidationSummary]) -> Vec<FoldMetricsRow> {
    let mut rows = Vec::new();
    for cv in summaries {
        let regime = cv.regime.to_string();
        for fold in &cv.folds {
            rows.push(FoldMetricsRow {
                regime: regime.clone(),
                fold: fold.label.clone(),
                train_size: fold.train_size,
                test_size: fold.test_size,
                train_r2: fold.train_r2,
                test_r2: fold.test_r2,
                train_mae: fold.train_mae,
                test_mae: fold.test_mae,
            });
        }
    }
    rows
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn serialize_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)
        .unwrap_or_default();
    Ok(data)
}

impl Exporter for Vec<FactorSummary> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => serialize_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<FoldMetricsRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => serialize_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<crate::consistency::Discrepancy> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => serialize_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_model::{CvRegime, ModelFitResult, OlsModel};

    fn sample_summaries() -> Vec<FactorSummary> {
        vec![FactorSummary {
            factor: "pace_score".to_string(),
            count: 12,
            mean: 70.5,
            std_dev: 9.25,
            min: 51.0,
            max: 88.0,
            q25: 64.0,
            median: 71.0,
            q75: 78.0,
        }]
    }

    fn sample_cv() -> CrossValidationSummary {
        let fold = ModelFitResult {
            label: "fold 1".to_string(),
            model: OlsModel {
                intercept: 9.5,
                coefficients: vec![-0.08],
            },
            train_size: 10,
            test_size: 2,
            train_r2: 0.92,
            test_r2: 0.85,
            train_mae: 0.5,
            test_mae: 0.8,
        };
        CrossValidationSummary {
            regime: CvRegime::KFold { k: 1, seed: 7 },
            folds: vec![fold],
            mean_train_r2: 0.92,
            mean_test_r2: 0.85,
            mean_train_mae: 0.5,
            mean_test_mae: 0.8,
        }
    }

    #[test]
    fn test_factor_summaries_csv() {
        let csv = sample_summaries()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.contains("factor,count,mean"));
        assert!(csv.contains("pace_score"));
        assert!(csv.contains("70.5"));
    }

    #[test]
    fn test_factor_summaries_json() {
        let json = sample_summaries()
            .export_to_string(ExportFormat::Json)
            .unwrap();
        assert!(json.contains("\"pace_score\""));
        assert!(json.contains("\"std_dev\""));
    }

    #[test]
    fn test_fold_metric_rows_flattening() {
        let rows = fold_metric_rows(&[sample_cv()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fold, "fold 1");
        assert_eq!(rows[0].regime, "1-fold (seed 7)");
        assert_eq!(rows[0].train_r2, 0.92);
        assert_eq!(rows[0].test_r2, 0.85);
    }

    #[test]
    fn test_fold_metrics_csv() {
        let rows = fold_metric_rows(&[sample_cv()]);
        let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("regime,fold,train_size,test_size"));
        assert!(csv.contains("0.92"));
        assert!(csv.contains("0.85"));
    }

    #[test]
    fn test_export_to_file() {
        use std::io::Read;

        let temp_dir = std::env::temp_dir();
        let path = temp_dir.join("paddock_test_export.csv");

        sample_summaries()
            .export_to_file(&path, ExportFormat::Csv)
            .unwrap();

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("pace_score"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
