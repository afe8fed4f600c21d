#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod describe;
pub mod driver;
pub mod error;
mod moments;
pub mod normalize;

pub use describe::{FactorSummary, describe_factors};
pub use driver::{DriverAggregate, FactorSpread, between_driver_spread, driver_aggregates};
pub use error::StatsError;
pub use normalize::{
    DEGENERATE_MIDPOINT, NormalizedFactorScore, midrank_percentiles, min_max_scale,
    normalized_scores,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
