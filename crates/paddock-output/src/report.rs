//! Report generation for Paddock analysis runs.

use crate::summary::AnalysisSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A timestamped report from one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Season or dataset label.
    pub season: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(season: String, contents: serde_json::Value) -> Self {
        Self {
            season,
            timestamp: Utc::now(),
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    season: Option<String>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the season label.
    pub fn season(mut self, season: String) -> Self {
        self.season = Some(season);
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: serde_json::Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Use an analysis summary as the report contents.
    pub fn summary(mut self, summary: &AnalysisSummary) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(summary)?);
        if self.season.is_none() {
            self.season = Some(summary.season.clone());
        }
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Report {
        Report::new(
            self.season.unwrap_or_default(),
            self.contents.unwrap_or(serde_json::Value::Null),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = Report::new("2024".to_string(), serde_json::json!({"test": "data"}));

        assert_eq!(report.season, "2024");
        assert_eq!(report.contents["test"], "data");
    }

    #[test]
    fn test_report_builder() {
        let report = ReportBuilder::new()
            .season("2024".to_string())
            .contents(serde_json::json!({"key": "value"}))
            .build();

        assert_eq!(report.season, "2024");
        assert_eq!(report.contents["key"], "value");
    }

    #[test]
    fn test_builder_from_summary() {
        let summary = AnalysisSummary::new("2023".to_string(), vec!["pace_score".to_string()]);
        let report = ReportBuilder::new().summary(&summary).unwrap().build();

        assert_eq!(report.season, "2023");
        assert_eq!(report.contents["season"], "2023");
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = Report::new("2024".to_string(), serde_json::json!({"folds": 5}));
        let json = report.to_json().unwrap();

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.season, "2024");
        assert_eq!(parsed.contents["folds"], 5);
    }
}
