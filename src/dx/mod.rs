//! Developer-experience overlay — one composite score from five
//! pipelines.
//!
//! Throughput reads the cluster mix, feedback blends commit density with
//! rework, focus measures how much of the window is feature work, and
//! per-file cognitive load combines complexity, coordination, knowledge
//! concentration and change rate. All weights are surfaced in the
//! report.

mod analyzer;
mod report;

pub use analyzer::{DXReport, FileCognitiveLoad, analyze, label_weight};
pub use report::{print_json, print_report};
