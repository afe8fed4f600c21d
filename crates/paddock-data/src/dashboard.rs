//! Dashboard document patching.
//!
//! The dashboard payload has `tracks` and `drivers` top-level lists; driver
//! entries carry `number` and `name` plus presentation fields this crate
//! must not touch. Name patching rewrites only the `name` field of drivers
//! present in the supplied roster mapping and leaves every other field and
//! record untouched.

use crate::error::{DataError, Result};
use serde_json::Value;
use std::path::Path;

/// A dashboard JSON payload, held as a raw value so unknown fields survive
/// a read-modify-write cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDocument {
    value: Value,
    source_name: String,
}

impl DashboardDocument {
    /// Load a dashboard document, validating the expected top-level shape.
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
        let value: Value = serde_json::from_str(&contents)?;
        Self::from_value(value, source_name)
    }

    /// Wrap an already-parsed dashboard value, validating its shape.
    pub fn from_value(value: Value, source_name: impl Into<String>) -> Result<Self> {
        let source_name = source_name.into();

        for key in ["tracks", "drivers"] {
            match value.get(key) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(DataError::InvalidDocument {
                        source_name,
                        reason: format!("`{key}` is not a list"),
                    });
                }
                None => {
                    return Err(DataError::MissingField {
                        source_name,
                        field: key.to_string(),
                    });
                }
            }
        }

        Ok(Self { value, source_name })
    }

    /// The underlying JSON value.
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Source label for report output.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Driver numbers present in the `drivers` list, in document order.
    pub fn driver_numbers(&self) -> Vec<u32> {
        self.drivers()
            .iter()
            .filter_map(|d| d.get("number").and_then(Value::as_u64))
            .map(|n| n as u32)
            .collect()
    }

    fn drivers(&self) -> &[Value] {
        // Shape validated at construction.
        self.value
            .get("drivers")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// Update driver `name` fields from a number-to-name mapping.
    ///
    /// Only drivers whose `number` appears in the mapping are touched, and
    /// only their `name` field changes. Returns the number of updated
    /// entries.
    pub fn update_driver_names<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(u32) -> Option<String>,
    {
        let Some(drivers) = self.value.get_mut("drivers").and_then(Value::as_array_mut) else {
            return 0;
        };

        let mut updated = 0;
        for driver in drivers {
            let Some(number) = driver.get("number").and_then(Value::as_u64) else {
                continue;
            };
            if let Some(name) = lookup(number as u32) {
                if let Some(object) = driver.as_object_mut() {
                    object.insert("name".to_string(), Value::String(name));
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Write the document back to disk, pretty-printed for readability.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.value)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
