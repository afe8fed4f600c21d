#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/paddock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod design;
pub mod error;
pub mod evaluate;
pub mod folds;
pub mod metrics;
pub mod ols;

pub use design::{Dataset, dataset_from_frame};
pub use error::ModelError;
pub use evaluate::{
    CrossValidationSummary, CvRegime, ModelFitResult, evaluate_default_k_fold, evaluate_k_fold,
    evaluate_leave_one_race_out, in_sample_fit,
};
pub use folds::{DEFAULT_K, Fold, k_fold, leave_one_race_out};
pub use metrics::{mean_absolute_error, r_squared};
pub use ols::OlsModel;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
