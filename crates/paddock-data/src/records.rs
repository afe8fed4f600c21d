//! Factor score tables.
//!
//! One row per (driver, race): identifiers plus a fixed set of factor score
//! columns, typically z-score normalized. Rows missing a required factor are
//! excluded from the table with a printed warning rather than defaulted;
//! a missing score is not a zero score.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Factor score columns tracked by default.
pub const DEFAULT_FACTOR_COLUMNS: [&str; 4] = [
    "pace_score",
    "consistency_score",
    "qualifying_score",
    "racecraft_score",
];

/// Column holding the driver identifier.
pub const DRIVER_COLUMN: &str = "driver_number";
/// Column holding the race identifier.
pub const RACE_COLUMN: &str = "race";
/// Column holding the finishing position (model target).
pub const FINISH_COLUMN: &str = "finish_position";

/// Configuration for the factor score loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Required factor score columns.
    pub factor_columns: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            factor_columns: DEFAULT_FACTOR_COLUMNS
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
        }
    }
}

/// One complete row of factor scores for a driver in a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScoreRecord {
    /// Car number of the driver.
    pub driver_number: u32,
    /// Race identifier.
    pub race: String,
    /// Finishing position, when the row carries one.
    pub finish_position: Option<f64>,
    /// Factor scores, aligned with the table's factor columns.
    pub scores: Vec<f64>,
}

/// An in-memory factor score table.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    factor_columns: Vec<String>,
    records: Vec<FactorScoreRecord>,
    skipped: usize,
}

impl ScoreTable {
    /// Build a table from pre-constructed records.
    ///
    /// Records whose score vector length does not match the factor column
    /// count are rejected.
    pub fn from_records(
        factor_columns: Vec<String>,
        records: Vec<FactorScoreRecord>,
    ) -> Result<Self> {
        for record in &records {
            if record.scores.len() != factor_columns.len() {
                return Err(DataError::Parse(format!(
                    "record for driver {} in {} has {} scores, expected {}",
                    record.driver_number,
                    record.race,
                    record.scores.len(),
                    factor_columns.len()
                )));
            }
        }

        Ok(Self {
            factor_columns,
            records,
            skipped: 0,
        })
    }

    /// Load a factor score table from a CSV file.
    ///
    /// The header must contain `driver_number`, `race`, and every configured
    /// factor column; `finish_position` is optional per row. Rows with a
    /// missing or unparseable factor value are skipped with a warning and
    /// counted in [`ScoreTable::skipped`].
    pub fn from_csv_path<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        if !path.exists() {
            return Err(DataError::MissingData {
                source_name,
                reason: "file not found".to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let column_index = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingField {
                    source_name: source_name.clone(),
                    field: name.to_string(),
                })
        };

        let driver_idx = column_index(DRIVER_COLUMN)?;
        let race_idx = column_index(RACE_COLUMN)?;
        let finish_idx = headers.iter().position(|h| h == FINISH_COLUMN);
        let factor_idxs = config
            .factor_columns
            .iter()
            .map(|c| column_index(c))
            .collect::<Result<Vec<_>>>()?;

        let mut records = Vec::new();
        let mut skipped = 0;

        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let row_number = line + 2; // header is line 1

            let Some(driver_number) = row.get(driver_idx).and_then(|v| v.trim().parse().ok())
            else {
                eprintln!(
                    "warning: {source_name}:{row_number}: unparseable {DRIVER_COLUMN}, row skipped"
                );
                skipped += 1;
                continue;
            };

            let race = match row.get(race_idx).map(str::trim) {
                Some(race) if !race.is_empty() => race.to_string(),
                _ => {
                    eprintln!(
                        "warning: {source_name}:{row_number}: empty {RACE_COLUMN}, row skipped"
                    );
                    skipped += 1;
                    continue;
                }
            };

            let mut scores = Vec::with_capacity(factor_idxs.len());
            let mut missing_factor = None;
            for (column, &idx) in config.factor_columns.iter().zip(&factor_idxs) {
                match row.get(idx).and_then(|v| v.trim().parse::<f64>().ok()) {
                    Some(score) => scores.push(score),
                    None => {
                        missing_factor = Some(column.clone());
                        break;
                    }
                }
            }

            if let Some(column) = missing_factor {
                eprintln!(
                    "warning: {source_name}:{row_number}: driver {driver_number} in {race} \
                     is missing {column}, row excluded from aggregation"
                );
                skipped += 1;
                continue;
            }

            let finish_position = finish_idx
                .and_then(|idx| row.get(idx))
                .and_then(|v| v.trim().parse::<f64>().ok());

            records.push(FactorScoreRecord {
                driver_number,
                race,
                finish_position,
                scores,
            });
        }

        if records.is_empty() {
            return Err(DataError::MissingData {
                source_name,
                reason: "no complete factor score rows".to_string(),
            });
        }

        Ok(Self {
            factor_columns: config.factor_columns.clone(),
            records,
            skipped,
        })
    }

    /// Factor column names, in table order.
    pub fn factor_columns(&self) -> &[String] {
        &self.factor_columns
    }

    /// All complete records, in input order.
    pub fn records(&self) -> &[FactorScoreRecord] {
        &self.records
    }

    /// Number of rows excluded during loading.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of complete records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct race identifiers, in first-appearance order.
    pub fn races(&self) -> Vec<String> {
        let mut races: Vec<String> = Vec::new();
        for record in &self.records {
            if !races.contains(&record.race) {
                races.push(record.race.clone());
            }
        }
        races
    }

    /// Convert the table to a polars DataFrame.
    ///
    /// Column order: `driver_number`, `race`, `finish_position`, then the
    /// factor columns. Absent finishing positions become nulls.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let driver_numbers: Vec<u32> = self.records.iter().map(|r| r.driver_number).collect();
        let races: Vec<String> = self.records.iter().map(|r| r.race.clone()).collect();
        let finishes: Vec<Option<f64>> = self.records.iter().map(|r| r.finish_position).collect();

        let mut columns = vec![
            Series::new(DRIVER_COLUMN.into(), driver_numbers).into(),
            Series::new(RACE_COLUMN.into(), races).into(),
            Series::new(FINISH_COLUMN.into(), finishes).into(),
        ];

        for (i, factor) in self.factor_columns.iter().enumerate() {
            let values: Vec<f64> = self.records.iter().map(|r| r.scores[i]).collect();
            columns.push(Series::new(factor.as_str().into(), values).into());
        }

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("paddock_records_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_complete_table() {
        let path = write_csv(
            "complete.csv",
            "driver_number,race,finish_position,pace_score,consistency_score,qualifying_score,racecraft_score\n\
             1,monaco,1,1.2,0.4,0.9,0.3\n\
             44,monaco,3,0.8,0.2,0.5,0.7\n",
        );

        let table = ScoreTable::from_csv_path(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped(), 0);
        assert_eq!(table.records()[0].driver_number, 1);
        assert_eq!(table.records()[0].scores, vec![1.2, 0.4, 0.9, 0.3]);
        assert_eq!(table.records()[1].finish_position, Some(3.0));
        assert_eq!(table.races(), vec!["monaco".to_string()]);
    }

    #[test]
    fn test_incomplete_row_skipped_not_zeroed() {
        let path = write_csv(
            "incomplete.csv",
            "driver_number,race,finish_position,pace_score,consistency_score,qualifying_score,racecraft_score\n\
             1,monaco,1,1.2,0.4,0.9,0.3\n\
             44,monaco,3,0.8,,0.5,0.7\n",
        );

        let table = ScoreTable::from_csv_path(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped(), 1);
        assert!(table.records().iter().all(|r| r.driver_number != 44));
    }

    #[test]
    fn test_missing_factor_column_is_an_error() {
        let path = write_csv(
            "missing_column.csv",
            "driver_number,race,pace_score\n1,monaco,1.2\n",
        );

        let err = ScoreTable::from_csv_path(&path, &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingField { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ScoreTable::from_csv_path("/nope/scores.csv", &LoaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingData { .. }));
    }

    #[test]
    fn test_to_dataframe() {
        let table = ScoreTable::from_records(
            vec!["pace_score".to_string(), "consistency_score".to_string()],
            vec![
                FactorScoreRecord {
                    driver_number: 1,
                    race: "monaco".to_string(),
                    finish_position: Some(1.0),
                    scores: vec![1.2, 0.4],
                },
                FactorScoreRecord {
                    driver_number: 44,
                    race: "monza".to_string(),
                    finish_position: None,
                    scores: vec![0.8, 0.2],
                },
            ],
        )
        .unwrap();

        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "driver_number",
                "race",
                "finish_position",
                "pace_score",
                "consistency_score"
            ]
        );
        assert_eq!(df.column("finish_position").unwrap().null_count(), 1);
    }

    #[test]
    fn test_mismatched_scores_rejected() {
        let err = ScoreTable::from_records(
            vec!["pace_score".to_string(), "consistency_score".to_string()],
            vec![FactorScoreRecord {
                driver_number: 1,
                race: "monaco".to_string(),
                finish_position: None,
                scores: vec![1.2],
            }],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
