//! Effort modeling — which files soak up engineering effort, and why.
//!
//! Fits a closed-form ridge regression from six history-derived features
//! to a commit-density/rework effort proxy, with the regularization
//! strength chosen by cross-validated grid search. Every coefficient is
//! surfaced; per-file attributions decompose each prediction into its
//! feature contributions.

mod analyzer;
mod report;
pub mod ridge;

pub use analyzer::{EffortReport, FEATURE_NAMES, FileEffort, analyze};
pub(crate) use analyzer::commit_density;
pub use report::{print_json, print_report};
