//! Hotspot analysis — files with unusually high change frequency × churn.
//!
//! Weights each change with a 30-day half-life so recent churn dominates,
//! scores files by the product of normalized weighted churn and weighted
//! frequency, and reports the Pareto concentration of churn (how few
//! files carry 50/80/90 % of it).

mod analyzer;
mod report;

pub use analyzer::{FileMetrics, HotspotReport, ParetoBuckets, analyze};
pub(crate) use analyzer::rework_ratio;
pub use report::{print_json, print_report};
