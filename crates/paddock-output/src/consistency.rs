//! Consistency and completeness auditing across aggregate sources.
//!
//! Two sources that claim to describe the same normalized factor scores are
//! compared metric by metric. Divergence beyond the tolerance is reported,
//! never reconciled; deciding which source is right is out of scope here.

use paddock_data::{AggregateSource, DataError, FactorAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default absolute tolerance on the 0-100 normalized scale.
///
/// Stored aggregates round to one decimal, so half a tick of headroom.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// One aggregate metric diverging between two sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Factor the metric belongs to.
    pub factor: String,
    /// Metric name (mean, min, max, mean_percentile, count).
    pub metric: String,
    /// Value reported by the primary source.
    pub primary_value: f64,
    /// Value reported by the secondary source.
    pub secondary_value: f64,
    /// Absolute difference.
    pub difference: f64,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {:.3} vs {:.3} (diff {:.3})",
            self.factor, self.metric, self.primary_value, self.secondary_value, self.difference
        )
    }
}

/// A driver covered by one source but absent from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDriver {
    /// Car number.
    pub driver_number: u32,
    /// Source that covers the driver.
    pub present_in: String,
    /// Source that lacks the driver.
    pub missing_from: String,
}

/// A factor reported by one source only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFactor {
    /// Factor name.
    pub factor: String,
    /// Source that reports the factor.
    pub present_in: String,
    /// Source that lacks the factor.
    pub missing_from: String,
}

/// Result of auditing two aggregate sources against each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Label of the primary source.
    pub primary_source: String,
    /// Label of the secondary source.
    pub secondary_source: String,
    /// Absolute tolerance applied per metric.
    pub tolerance: f64,
    /// Factors compared in both sources.
    pub factors_compared: usize,
    /// Metrics diverging beyond the tolerance.
    pub discrepancies: Vec<Discrepancy>,
    /// Factors reported by one source only.
    pub missing_factors: Vec<MissingFactor>,
    /// Drivers covered by one source only.
    pub missing_drivers: Vec<MissingDriver>,
}

impl ConsistencyReport {
    /// Audit `secondary` against `primary` with the default tolerance.
    pub fn compare(
        primary: &dyn AggregateSource,
        secondary: &dyn AggregateSource,
    ) -> Result<Self, DataError> {
        Self::compare_with_tolerance(primary, secondary, DEFAULT_TOLERANCE)
    }

    /// Audit `secondary` against `primary` with an explicit tolerance.
    pub fn compare_with_tolerance(
        primary: &dyn AggregateSource,
        secondary: &dyn AggregateSource,
        tolerance: f64,
    ) -> Result<Self, DataError> {
        let primary_aggs: BTreeMap<String, FactorAggregate> = primary
            .factor_aggregates()?
            .into_iter()
            .map(|a| (a.factor.clone(), a))
            .collect();
        let secondary_aggs: BTreeMap<String, FactorAggregate> = secondary
            .factor_aggregates()?
            .into_iter()
            .map(|a| (a.factor.clone(), a))
            .collect();

        let mut discrepancies = Vec::new();
        let mut missing_factors = Vec::new();
        let mut factors_compared = 0;

        for (factor, p) in &primary_aggs {
            let Some(s) = secondary_aggs.get(factor) else {
                missing_factors.push(MissingFactor {
                    factor: factor.clone(),
                    present_in: primary.source_name().to_string(),
                    missing_from: secondary.source_name().to_string(),
                });
                continue;
            };
            factors_compared += 1;

            let mut check = |metric: &str, pv: f64, sv: f64| {
                let difference = (pv - sv).abs();
                if difference > tolerance {
                    discrepancies.push(Discrepancy {
                        factor: factor.clone(),
                        metric: metric.to_string(),
                        primary_value: pv,
                        secondary_value: sv,
                        difference,
                    });
                }
            };

            check("mean", p.mean, s.mean);
            check("min", p.min, s.min);
            check("max", p.max, s.max);
            if let (Some(pp), Some(sp)) = (p.mean_percentile, s.mean_percentile) {
                check("mean_percentile", pp, sp);
            }
            check("count", p.count as f64, s.count as f64);
        }

        for factor in secondary_aggs.keys() {
            if !primary_aggs.contains_key(factor) {
                missing_factors.push(MissingFactor {
                    factor: factor.clone(),
                    present_in: secondary.source_name().to_string(),
                    missing_from: primary.source_name().to_string(),
                });
            }
        }

        let missing_drivers = driver_completeness(
            primary.source_name(),
            &primary.driver_numbers()?,
            secondary.source_name(),
            &secondary.driver_numbers()?,
        );

        Ok(Self {
            primary_source: primary.source_name().to_string(),
            secondary_source: secondary.source_name().to_string(),
            tolerance,
            factors_compared,
            discrepancies,
            missing_factors,
            missing_drivers,
        })
    }

    /// Whether the two sources agree within tolerance and cover the same
    /// drivers and factors.
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
            && self.missing_factors.is_empty()
            && self.missing_drivers.is_empty()
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nConsistency Audit: {} vs {}\n",
            self.primary_source, self.secondary_source
        ));
        output.push_str(&format!(
            "Tolerance: {} | Factors compared: {}\n",
            self.tolerance, self.factors_compared
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.is_consistent() {
            output.push_str("\nSources are consistent.\n");
        }

        if !self.discrepancies.is_empty() {
            output.push_str("\nDiscrepancies:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<20} {:<16} {:>12} {:>12} {:>12}\n",
                "Factor", "Metric", "Primary", "Secondary", "Diff"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for d in &self.discrepancies {
                output.push_str(&format!(
                    "{:<20} {:<16} {:>12.3} {:>12.3} {:>12.3}\n",
                    d.factor, d.metric, d.primary_value, d.secondary_value, d.difference
                ));
            }
        }

        if !self.missing_factors.is_empty() {
            output.push_str("\nFactors missing from one source:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for m in &self.missing_factors {
                output.push_str(&format!(
                    "  {} (in {}, missing from {})\n",
                    m.factor, m.present_in, m.missing_from
                ));
            }
        }

        if !self.missing_drivers.is_empty() {
            output.push_str("\nDrivers missing from one source:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            for m in &self.missing_drivers {
                output.push_str(&format!(
                    "  #{} (in {}, missing from {})\n",
                    m.driver_number, m.present_in, m.missing_from
                ));
            }
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Consistency Audit: {} vs {} (tolerance {})",
            self.primary_source, self.secondary_source, self.tolerance
        )?;
        writeln!(
            f,
            "  {} factors compared, {} discrepancies, {} missing factors, {} missing drivers",
            self.factors_compared,
            self.discrepancies.len(),
            self.missing_factors.len(),
            self.missing_drivers.len()
        )?;
        for d in &self.discrepancies {
            writeln!(f, "  {d}")?;
        }
        Ok(())
    }
}

/// Flag identifiers covered by one side only.
///
/// Works over any pair of driver-number sets, so season stats and race
/// results documents go through the same machinery as aggregate sources.
pub fn driver_completeness(
    primary_name: &str,
    primary_drivers: &[u32],
    secondary_name: &str,
    secondary_drivers: &[u32],
) -> Vec<MissingDriver> {
    let primary_set: std::collections::BTreeSet<u32> = primary_drivers.iter().copied().collect();
    let secondary_set: std::collections::BTreeSet<u32> =
        secondary_drivers.iter().copied().collect();

    let mut missing = Vec::new();
    for &n in primary_set.difference(&secondary_set) {
        missing.push(MissingDriver {
            driver_number: n,
            present_in: primary_name.to_string(),
            missing_from: secondary_name.to_string(),
        });
    }
    for &n in secondary_set.difference(&primary_set) {
        missing.push(MissingDriver {
            driver_number: n,
            present_in: secondary_name.to_string(),
            missing_from: primary_name.to_string(),
        });
    }
    missing
}
