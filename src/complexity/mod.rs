//! Function-level complexity analysis over the AST summaries.
//!
//! Reports cyclomatic and cognitive complexity, static nesting depth,
//! branch and exception-path counts, and length for every top-level
//! function and direct class method in the analyzed tree.

mod analyzer;
mod report;

pub use analyzer::{ComplexityReport, FunctionComplexity, analyze};
pub use report::{print_json, print_report};
