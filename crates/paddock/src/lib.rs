#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod roster;

// Re-export main types from sub-crates
pub use paddock_data as data;
pub use paddock_model as model;
pub use paddock_output as output;
pub use paddock_stats as stats;

// Re-export common roster types
pub use roster::{DriverEntry, DriverRoster, RosterError};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
