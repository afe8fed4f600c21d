#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod consistency;
pub mod export;
pub mod report;
pub mod summary;

pub use consistency::{
    ConsistencyReport, DEFAULT_TOLERANCE, Discrepancy, MissingDriver, MissingFactor,
    driver_completeness,
};
pub use export::{ExportError, ExportFormat, Exporter, FoldMetricsRow, fold_metric_rows};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::AnalysisSummary;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
