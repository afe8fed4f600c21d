//! Typed JSON documents used by the dashboard pipeline.
//!
//! Three shapes appear in the snapshot directory: the driver-factor document
//! (a `drivers` list, each with a `factors` map), and the season-stats and
//! race-results documents (a `data` map keyed by driver identifier).

use crate::error::{DataError, Result};
use crate::source::{AggregateSource, FactorAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One factor entry inside a driver's `factors` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorEntry {
    /// Normalized presentation score (0-100).
    pub score: f64,
    /// Percentile relative to the full driver population, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// Raw z-score the presentation score was derived from, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
}

/// One driver entry in the driver-factor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFactors {
    /// Car number of the driver.
    pub driver_number: u32,
    /// Display name, when the snapshot carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Factor name to entry mapping.
    pub factors: BTreeMap<String, FactorEntry>,
}

/// The driver-factor JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFactorsDocument {
    /// All drivers in the snapshot.
    pub drivers: Vec<DriverFactors>,

    /// Label used in report output. Defaults to the file name on load.
    #[serde(skip)]
    source_name: String,
}

impl DriverFactorsDocument {
    /// Load a driver-factor document from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        if !path.exists() {
            return Err(DataError::MissingData {
                source_name,
                reason: "file not found".to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let mut document: Self = serde_json::from_str(&contents)?;
        document.source_name = path
            .file_name()
            .map_or(source_name, |n| n.to_string_lossy().into_owned());

        if document.drivers.is_empty() {
            return Err(DataError::InvalidDocument {
                source_name: document.source_name,
                reason: "empty drivers list".to_string(),
            });
        }

        Ok(document)
    }

    /// Build a document from driver entries, with an explicit source label.
    pub fn new(source_name: impl Into<String>, drivers: Vec<DriverFactors>) -> Self {
        Self {
            drivers,
            source_name: source_name.into(),
        }
    }

    /// All factor names appearing in the document, sorted.
    pub fn factor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .drivers
            .iter()
            .flat_map(|d| d.factors.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl AggregateSource for DriverFactorsDocument {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn factor_aggregates(&self) -> Result<Vec<FactorAggregate>> {
        let mut aggregates = Vec::new();

        for factor in self.factor_names() {
            let scores: Vec<f64> = self
                .drivers
                .iter()
                .filter_map(|d| d.factors.get(&factor).map(|e| e.score))
                .collect();
            let percentiles: Vec<f64> = self
                .drivers
                .iter()
                .filter_map(|d| d.factors.get(&factor).and_then(|e| e.percentile))
                .collect();

            if scores.is_empty() {
                continue;
            }

            let count = scores.len();
            let mean = scores.iter().sum::<f64>() / count as f64;
            let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let mean_percentile = if percentiles.is_empty() {
                None
            } else {
                Some(percentiles.iter().sum::<f64>() / percentiles.len() as f64)
            };

            aggregates.push(FactorAggregate {
                factor,
                mean,
                min,
                max,
                mean_percentile,
                count,
            });
        }

        Ok(aggregates)
    }

    fn driver_numbers(&self) -> Result<Vec<u32>> {
        let mut numbers: Vec<u32> = self.drivers.iter().map(|d| d.driver_number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        Ok(numbers)
    }
}

/// A document with a `data` map keyed by driver identifier.
///
/// Season-stats and race-results snapshots share this shape; the per-driver
/// payload is kept opaque since only coverage is audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverKeyedDocument {
    /// Driver identifier to payload mapping.
    pub data: BTreeMap<String, serde_json::Value>,

    /// Label used in report output. Defaults to the file name on load.
    #[serde(skip)]
    source_name: String,
}

impl DriverKeyedDocument {
    /// Load a driver-keyed document from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        if !path.exists() {
            return Err(DataError::MissingData {
                source_name,
                reason: "file not found".to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let mut document: Self = serde_json::from_str(&contents)?;
        document.source_name = path
            .file_name()
            .map_or(source_name, |n| n.to_string_lossy().into_owned());
        Ok(document)
    }

    /// Label used in report output.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Driver identifiers covered by the document, sorted.
    pub fn driver_ids(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Driver numbers covered by the document, for keys that parse as
    /// numbers. Non-numeric keys are skipped.
    pub fn driver_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .data
            .keys()
            .filter_map(|k| k.trim().parse().ok())
            .collect();
        numbers.sort_unstable();
        numbers
    }
}
