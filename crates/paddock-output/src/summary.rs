//! Season analysis summary rendering.
//!
//! Collects the outputs of the statistics and model stages into one
//! reportable value and renders it for the terminal or for documentation.
//! In-sample and out-of-sample model metrics always appear in separate
//! columns so a generalization gap is visible, never averaged away.

use paddock_model::CrossValidationSummary;
use paddock_stats::{DriverAggregate, FactorSpread, FactorSummary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consolidated results of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Season or dataset label.
    pub season: String,

    /// Records that entered the analysis.
    pub records_used: usize,

    /// Records skipped for missing factor values.
    pub records_skipped: usize,

    /// Factor columns, in report order.
    pub factor_columns: Vec<String>,

    /// Descriptive statistics per factor.
    pub factor_summaries: Vec<FactorSummary>,

    /// Per-driver mean factor scores.
    pub driver_aggregates: Vec<DriverAggregate>,

    /// Spread of per-driver means per factor.
    pub spreads: Vec<FactorSpread>,

    /// Cross-validation results, one entry per regime evaluated.
    pub cross_validation: Vec<CrossValidationSummary>,
}

impl AnalysisSummary {
    /// Create a summary with no model results attached yet.
    pub fn new(season: String, factor_columns: Vec<String>) -> Self {
        Self {
            season,
            records_used: 0,
            records_skipped: 0,
            factor_columns,
            factor_summaries: Vec::new(),
            driver_aggregates: Vec::new(),
            spreads: Vec::new(),
            cross_validation: Vec::new(),
        }
    }

    /// Largest in-sample/out-of-sample R² gap across evaluated regimes.
    pub fn worst_generalization_gap(&self) -> Option<f64> {
        self.cross_validation
            .iter()
            .map(CrossValidationSummary::generalization_gap)
            .fold(None, |acc, gap| {
                Some(acc.map_or(gap, |a: f64| a.max(gap)))
            })
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nSeason Analysis: {}\n", self.season));
        output.push_str(&format!(
            "Records: {} used, {} skipped\n",
            self.records_used, self.records_skipped
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if !self.factor_summaries.is_empty() {
            output.push_str("\nFactor Statistics:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<20} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
                "Factor", "Count", "Mean", "Std", "Min", "Q25", "Median", "Max"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for s in &self.factor_summaries {
                output.push_str(&format!(
                    "{:<20} {:>6} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}\n",
                    s.factor, s.count, s.mean, s.std_dev, s.min, s.q25, s.median, s.max
                ));
            }
        }

        if !self.spreads.is_empty() {
            output.push_str("\nBetween-Driver Spread:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for spread in &self.spreads {
                output.push_str(&format!(
                    "  {:<28} {:.3}\n",
                    spread.factor, spread.between_driver_std
                ));
            }
        }

        if !self.driver_aggregates.is_empty() {
            output.push_str("\nPer-Driver Means:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!("{:<10} {:>6}", "Driver", "Races"));
            for factor in &self.factor_columns {
                output.push_str(&format!(" {:>18}", factor));
            }
            output.push('\n');
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for agg in &self.driver_aggregates {
                output.push_str(&format!("{:<10} {:>6}", agg.driver_number, agg.races));
                for mean in &agg.means {
                    output.push_str(&format!(" {:>18.2}", mean));
                }
                output.push('\n');
            }
        }

        if !self.cross_validation.is_empty() {
            output.push_str("\nModel Validation:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for cv in &self.cross_validation {
                output.push_str(&format!("  Regime: {}\n", cv.regime));
                output.push_str(&format!(
                    "  {:<16} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10}\n",
                    "Fold", "Train", "Test", "Train R2", "Test R2", "Train MAE", "Test MAE"
                ));
                for fold in &cv.folds {
                    output.push_str(&format!(
                        "  {:<16} {:>6} {:>6} {:>10.4} {:>10.4} {:>10.3} {:>10.3}\n",
                        fold.label,
                        fold.train_size,
                        fold.test_size,
                        fold.train_r2,
                        fold.test_r2,
                        fold.train_mae,
                        fold.test_mae
                    ));
                }
                output.push_str(&format!(
                    "  Mean: train R2 {:.4}, test R2 {:.4}, gap {:.4}\n\n",
                    cv.mean_train_r2,
                    cv.mean_test_r2,
                    cv.generalization_gap()
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Season Analysis: {}\n\n", self.season));
        output.push_str(&format!(
            "**Records:** {} used, {} skipped\n\n",
            self.records_used, self.records_skipped
        ));

        if !self.factor_summaries.is_empty() {
            output.push_str("## Factor Statistics\n\n");
            output.push_str("| Factor | Count | Mean | Std | Min | Q25 | Median | Q75 | Max |\n");
            output.push_str("|--------|-------|------|-----|-----|-----|--------|-----|-----|\n");
            for s in &self.factor_summaries {
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
                    s.factor, s.count, s.mean, s.std_dev, s.min, s.q25, s.median, s.q75, s.max
                ));
            }
            output.push('\n');
        }

        if !self.spreads.is_empty() {
            output.push_str("## Between-Driver Spread\n\n");
            for spread in &self.spreads {
                output.push_str(&format!(
                    "- **{}:** {:.3}\n",
                    spread.factor, spread.between_driver_std
                ));
            }
            output.push('\n');
        }

        if !self.cross_validation.is_empty() {
            output.push_str("## Model Validation\n\n");
            for cv in &self.cross_validation {
                output.push_str(&format!("### {}\n\n", cv.regime));
                output.push_str(
                    "| Fold | Train | Test | Train R2 | Test R2 | Train MAE | Test MAE |\n",
                );
                output.push_str(
                    "|------|-------|------|----------|---------|-----------|----------|\n",
                );
                for fold in &cv.folds {
                    output.push_str(&format!(
                        "| {} | {} | {} | {:.4} | {:.4} | {:.3} | {:.3} |\n",
                        fold.label,
                        fold.train_size,
                        fold.test_size,
                        fold.train_r2,
                        fold.test_r2,
                        fold.train_mae,
                        fold.test_mae
                    ));
                }
                output.push_str(&format!(
                    "\nMean train R2 {:.4}, mean test R2 {:.4}, gap {:.4}\n\n",
                    cv.mean_train_r2,
                    cv.mean_test_r2,
                    cv.generalization_gap()
                ));
            }
        }

        output
    }
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Season Analysis: {} ({} records, {} skipped)",
            self.season, self.records_used, self.records_skipped
        )?;
        for s in &self.factor_summaries {
            writeln!(
                f,
                "  {}: mean {:.2}, std {:.2}, range [{:.2}, {:.2}]",
                s.factor, s.mean, s.std_dev, s.min, s.max
            )?;
        }
        for cv in &self.cross_validation {
            writeln!(
                f,
                "  {}: train R2 {:.4}, test R2 {:.4}",
                cv.regime, cv.mean_train_r2, cv.mean_test_r2
            )?;
        }
        Ok(())
    }
}
