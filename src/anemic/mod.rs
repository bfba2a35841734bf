//! Anemic-model detection — classes that are all data and no behavior.
//!
//! DBSI measures the field share of a class's surface, orchestration
//! pressure measures how little logic its methods carry, and their
//! product (AMS) flags classes whose behavior most likely lives in
//! surrounding service code.

mod analyzer;
mod report;

pub use analyzer::{AnemicReport, ClassMetrics, analyze};
pub use report::{print_json, print_report};
