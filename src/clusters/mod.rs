//! Commit clustering — what kind of work the window contains.
//!
//! Embeds each commit as a normalized `[file_count, total_churn,
//! add_ratio]` vector, clusters with K-Means++ (auto-k via silhouette),
//! labels each centroid (feature / bugfix / refactoring / config /
//! mixed), and measures label drift between the two halves of the
//! window. Pure arithmetic, deterministic under a supplied seed.

mod analyzer;
mod kmeans;
mod report;

pub use analyzer::{ClusterDrift, ClusterReport, ClusterSummary, Label, analyze};
pub use kmeans::{KMeansResult, auto_k, kmeans, silhouette};
pub use report::{print_json, print_report};
