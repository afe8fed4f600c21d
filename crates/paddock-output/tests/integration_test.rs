//! Integration tests for the consistency audit and report rendering.

use paddock_data::{
    DriverFactors, DriverFactorsDocument, FactorBreakdown, FactorEntry, SqliteAggregateSource,
};
use paddock_output::{ConsistencyReport, ExportFormat, Exporter, ReportBuilder};
use std::collections::BTreeMap;

fn json_source() -> DriverFactorsDocument {
    let mut verstappen = BTreeMap::new();
    verstappen.insert(
        "pace_score".to_string(),
        FactorEntry {
            score: 95.0,
            percentile: Some(99.0),
            raw: None,
        },
    );

    let mut hamilton = BTreeMap::new();
    hamilton.insert(
        "pace_score".to_string(),
        FactorEntry {
            score: 85.0,
            percentile: Some(80.0),
            raw: None,
        },
    );

    DriverFactorsDocument::new(
        "driver_factors.json",
        vec![
            DriverFactors {
                driver_number: 1,
                name: Some("M. Verstappen".to_string()),
                factors: verstappen,
            },
            DriverFactors {
                driver_number: 44,
                name: Some("L. Hamilton".to_string()),
                factors: hamilton,
            },
        ],
    )
}

fn sqlite_source(pace_values: [(u32, f64, f64); 2]) -> SqliteAggregateSource {
    let source = SqliteAggregateSource::in_memory().unwrap();
    let breakdowns: Vec<FactorBreakdown> = pace_values
        .iter()
        .map(|&(driver_number, normalized_value, percentile)| FactorBreakdown {
            driver_number,
            race: "monaco".to_string(),
            factor_name: "pace_score".to_string(),
            normalized_value,
            percentile,
        })
        .collect();
    source.put_breakdowns(&breakdowns).unwrap();
    source
}

#[test]
fn test_audit_of_agreeing_sources() {
    let json = json_source();
    let sqlite = sqlite_source([(1, 95.0, 99.0), (44, 85.0, 80.0)]);

    let report = ConsistencyReport::compare(&json, &sqlite).unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.factors_compared, 1);

    let table = report.to_ascii_table();
    assert!(table.contains("Sources are consistent."));
}

#[test]
fn test_audit_flags_diverging_mean() {
    let json = json_source();
    // Stored value for Hamilton drifted by 2 points.
    let sqlite = sqlite_source([(1, 95.0, 99.0), (44, 83.0, 80.0)]);

    let report = ConsistencyReport::compare(&json, &sqlite).unwrap();
    assert!(!report.is_consistent());

    let means: Vec<&str> = report
        .discrepancies
        .iter()
        .map(|d| d.metric.as_str())
        .collect();
    assert!(means.contains(&"mean"));
    assert!(means.contains(&"min"));

    // Divergence is reported, never reconciled: both values survive verbatim.
    let mean = report
        .discrepancies
        .iter()
        .find(|d| d.metric == "mean")
        .unwrap();
    assert_eq!(mean.primary_value, 90.0);
    assert_eq!(mean.secondary_value, 89.0);
}

#[test]
fn test_audit_flags_missing_driver() {
    let json = json_source();
    let sqlite = SqliteAggregateSource::in_memory().unwrap();
    sqlite
        .put_breakdowns(&[FactorBreakdown {
            driver_number: 1,
            race: "monaco".to_string(),
            factor_name: "pace_score".to_string(),
            normalized_value: 95.0,
            percentile: 99.0,
        }])
        .unwrap();

    let report = ConsistencyReport::compare(&json, &sqlite).unwrap();
    assert!(!report.is_consistent());
    assert_eq!(report.missing_drivers.len(), 1);
    assert_eq!(report.missing_drivers[0].driver_number, 44);
    assert_eq!(report.missing_drivers[0].present_in, "driver_factors.json");
}

#[test]
fn test_discrepancies_export_as_csv() {
    let json = json_source();
    let sqlite = sqlite_source([(1, 95.0, 99.0), (44, 80.0, 80.0)]);

    let report = ConsistencyReport::compare(&json, &sqlite).unwrap();
    let csv = report
        .discrepancies
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    assert!(csv.contains("factor,metric,primary_value,secondary_value,difference"));
    assert!(csv.contains("pace_score"));
}

#[test]
fn test_report_payload_round_trip() {
    let json = json_source();
    let sqlite = sqlite_source([(1, 95.0, 99.0), (44, 85.0, 80.0)]);
    let audit = ConsistencyReport::compare(&json, &sqlite).unwrap();

    let report = ReportBuilder::new()
        .season("2024".to_string())
        .contents(serde_json::to_value(&audit).unwrap())
        .build();

    let serialized = report.to_json().unwrap();
    assert!(serialized.contains("\"season\": \"2024\""));
    assert!(serialized.contains("\"factors_compared\": 1"));
}
