use serde::Serialize;

use crate::lang::SourceModule;

/// Complexity metrics for one function or method.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionComplexity {
    pub file: String,
    /// Methods are qualified as `Class.method`.
    pub name: String,
    /// 1-based declaration line.
    pub line: usize,
    pub cyclomatic: usize,
    pub cognitive: usize,
    pub max_nesting: usize,
    pub branches: usize,
    pub except_paths: usize,
    pub length: usize,
}

/// Complexity pipeline output, sorted by cyclomatic descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplexityReport {
    pub functions: Vec<FunctionComplexity>,
    pub file_count: usize,
    pub mean_cyclomatic: f64,
    pub max_cognitive: usize,
}

/// Flatten parsed modules into per-function complexity rows.
pub fn analyze(modules: &[SourceModule]) -> ComplexityReport {
    let mut functions: Vec<FunctionComplexity> = Vec::new();

    for module in modules {
        for f in &module.functions {
            functions.push(row(&module.path, f.name.clone(), f));
        }
        for class in &module.classes {
            for method in &class.methods {
                let name = format!("{}.{}", class.name, method.function.name);
                functions.push(row(&module.path, name, &method.function));
            }
        }
    }

    functions.sort_by(|a, b| {
        b.cyclomatic
            .cmp(&a.cyclomatic)
            .then_with(|| b.cognitive.cmp(&a.cognitive))
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });

    let mean_cyclomatic = if functions.is_empty() {
        0.0
    } else {
        functions.iter().map(|f| f.cyclomatic).sum::<usize>() as f64 / functions.len() as f64
    };
    let max_cognitive = functions.iter().map(|f| f.cognitive).max().unwrap_or(0);

    ComplexityReport {
        file_count: modules.len(),
        mean_cyclomatic,
        max_cognitive,
        functions,
    }
}

fn row(file: &str, name: String, f: &crate::lang::FunctionSummary) -> FunctionComplexity {
    FunctionComplexity {
        file: file.to_string(),
        name,
        line: f.line,
        cyclomatic: f.metrics.cyclomatic,
        cognitive: f.metrics.cognitive,
        max_nesting: f.metrics.max_nesting,
        branches: f.metrics.branches,
        except_paths: f.metrics.except_paths,
        length: f.length.max(1),
    }
}
