//! Driver roster: the explicit driver-number-to-name configuration table.
//!
//! The roster is always passed into the operations that need it (dashboard
//! name patching, report labeling); nothing in the workspace holds an
//! implicit global name map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The roster file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The roster file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same driver number appears twice in the roster.
    #[error("Duplicate driver number in roster: {0}")]
    DuplicateNumber(u32),
}

/// A single roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEntry {
    /// Car number used across all data sources.
    pub number: u32,
    /// Display name for dashboard and report output.
    pub name: String,
}

impl DriverEntry {
    /// Create a new roster entry.
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

/// Driver roster with number-based lookup.
#[derive(Debug, Clone)]
pub struct DriverRoster {
    entries: Vec<DriverEntry>,
    number_to_name: HashMap<u32, String>,
}

impl DriverRoster {
    /// Build a roster from (number, name) pairs.
    ///
    /// Later pairs override earlier ones with the same number.
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (u32, N)>,
    {
        let entries: Vec<DriverEntry> = pairs
            .into_iter()
            .map(|(number, name)| DriverEntry::new(number, name))
            .collect();
        let number_to_name = entries
            .iter()
            .map(|e| (e.number, e.name.clone()))
            .collect();

        Self {
            entries,
            number_to_name,
        }
    }

    /// Load a roster from a JSON file.
    ///
    /// The file is a list of `{ "number": 44, "name": "L. Hamilton" }`
    /// objects. Duplicate numbers are rejected rather than silently merged.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<DriverEntry> = serde_json::from_str(&contents)?;

        let mut number_to_name = HashMap::with_capacity(entries.len());
        for entry in &entries {
            if number_to_name
                .insert(entry.number, entry.name.clone())
                .is_some()
            {
                return Err(RosterError::DuplicateNumber(entry.number));
            }
        }

        Ok(Self {
            entries,
            number_to_name,
        })
    }

    /// Get all roster entries.
    pub fn entries(&self) -> &[DriverEntry] {
        &self.entries
    }

    /// Get all driver numbers.
    pub fn numbers(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.number).collect()
    }

    /// Look up the name for a driver number.
    pub fn name(&self, number: u32) -> Option<&str> {
        self.number_to_name.get(&number).map(String::as_str)
    }

    /// Check whether a driver number is on the roster.
    pub fn contains(&self, number: u32) -> bool {
        self.number_to_name.contains_key(&number)
    }

    /// Number of drivers on the roster.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_lookup() {
        let roster = DriverRoster::from_pairs([(1, "M. Verstappen"), (44, "L. Hamilton")]);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.name(44), Some("L. Hamilton"));
        assert_eq!(roster.name(99), None);
        assert!(roster.contains(1));
        assert!(!roster.contains(99));
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("paddock_roster_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");
        std::fs::write(
            &path,
            r#"[{"number": 16, "name": "C. Leclerc"}, {"number": 4, "name": "L. Norris"}]"#,
        )
        .unwrap();

        let roster = DriverRoster::from_json_file(&path).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.name(16), Some("C. Leclerc"));
        assert_eq!(roster.numbers(), vec![16, 4]);
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let dir = std::env::temp_dir().join("paddock_roster_dup_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roster.json");
        std::fs::write(
            &path,
            r#"[{"number": 16, "name": "C. Leclerc"}, {"number": 16, "name": "Other"}]"#,
        )
        .unwrap();

        let err = DriverRoster::from_json_file(&path).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateNumber(16)));
    }

    #[test]
    fn test_empty_roster() {
        let roster = DriverRoster::from_pairs(Vec::<(u32, String)>::new());
        assert!(roster.is_empty());
        assert_eq!(roster.numbers().len(), 0);
    }
}
