//! SQLite-backed secondary aggregate source.
//!
//! The legacy relational store keeps per-(driver, race, factor) breakdowns
//! in a `factor_breakdowns` table. This module exposes that table through
//! the read-only [`AggregateSource`] trait; the write path exists so
//! fixtures and migrations can populate the table the reporter audits.

use crate::error::Result;
use crate::source::{AggregateSource, FactorAggregate};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One breakdown row in the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// Car number of the driver.
    pub driver_number: u32,
    /// Race identifier.
    pub race: String,
    /// Factor name.
    pub factor_name: String,
    /// Normalized presentation value (0-100).
    pub normalized_value: f64,
    /// Percentile relative to the full population.
    pub percentile: f64,
}

/// SQLite source of factor breakdowns.
#[derive(Debug)]
pub struct SqliteAggregateSource {
    conn: Connection,
    source_name: String,
}

impl SqliteAggregateSource {
    /// Open a breakdown database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source_name = path.as_ref().display().to_string();
        let conn = Connection::open(path)?;
        let source = Self { conn, source_name };
        source.initialize_schema()?;
        Ok(source)
    }

    /// Create an in-memory source (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let source = Self {
            conn,
            source_name: "sqlite (in-memory)".to_string(),
        };
        source.initialize_schema()?;
        Ok(source)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS factor_breakdowns (
                driver_number INTEGER NOT NULL,
                race TEXT NOT NULL,
                factor_name TEXT NOT NULL,
                normalized_value REAL NOT NULL,
                percentile REAL NOT NULL,
                PRIMARY KEY (driver_number, race, factor_name)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_breakdowns_factor
             ON factor_breakdowns(factor_name)",
            [],
        )?;

        Ok(())
    }

    /// Store a batch of breakdown rows in one transaction.
    pub fn put_breakdowns(&self, breakdowns: &[FactorBreakdown]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        for breakdown in breakdowns {
            tx.execute(
                "INSERT OR REPLACE INTO factor_breakdowns
                 (driver_number, race, factor_name, normalized_value, percentile)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    breakdown.driver_number,
                    breakdown.race,
                    breakdown.factor_name,
                    breakdown.normalized_value,
                    breakdown.percentile,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// All breakdown rows for one factor, ordered by driver and race.
    pub fn breakdowns_for_factor(&self, factor_name: &str) -> Result<Vec<FactorBreakdown>> {
        let mut stmt = self.conn.prepare(
            "SELECT driver_number, race, factor_name, normalized_value, percentile
             FROM factor_breakdowns
             WHERE factor_name = ?1
             ORDER BY driver_number, race",
        )?;

        let rows = stmt.query_map(params![factor_name], |row| {
            Ok(FactorBreakdown {
                driver_number: row.get(0)?,
                race: row.get(1)?,
                factor_name: row.get(2)?,
                normalized_value: row.get(3)?,
                percentile: row.get(4)?,
            })
        })?;

        let mut breakdowns = Vec::new();
        for row in rows {
            breakdowns.push(row?);
        }

        Ok(breakdowns)
    }

    /// Total number of breakdown rows.
    pub fn count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM factor_breakdowns", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }
}

impl AggregateSource for SqliteAggregateSource {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn factor_aggregates(&self) -> Result<Vec<FactorAggregate>> {
        let mut stmt = self.conn.prepare(
            "SELECT factor_name,
                    AVG(normalized_value),
                    MIN(normalized_value),
                    MAX(normalized_value),
                    AVG(percentile),
                    COUNT(*)
             FROM factor_breakdowns
             GROUP BY factor_name
             ORDER BY factor_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FactorAggregate {
                factor: row.get(0)?,
                mean: row.get(1)?,
                min: row.get(2)?,
                max: row.get(3)?,
                mean_percentile: Some(row.get(4)?),
                count: row.get::<_, i64>(5)? as usize,
            })
        })?;

        let mut aggregates = Vec::new();
        for row in rows {
            aggregates.push(row?);
        }

        Ok(aggregates)
    }

    fn driver_numbers(&self) -> Result<Vec<u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT driver_number FROM factor_breakdowns ORDER BY driver_number",
        )?;

        let numbers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<u32>, _>>()?;

        Ok(numbers)
    }
}
