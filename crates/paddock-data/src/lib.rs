#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dashboard;
pub mod documents;
pub mod error;
pub mod records;
pub mod source;
pub mod sqlite;

pub use dashboard::DashboardDocument;
pub use documents::{DriverFactors, DriverFactorsDocument, DriverKeyedDocument, FactorEntry};
pub use error::{DataError, Result};
pub use records::{
    DEFAULT_FACTOR_COLUMNS, DRIVER_COLUMN, FINISH_COLUMN, FactorScoreRecord, LoaderConfig,
    RACE_COLUMN, ScoreTable,
};
pub use source::{AggregateSource, FactorAggregate};
pub use sqlite::{FactorBreakdown, SqliteAggregateSource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
