use serde::Serialize;

use crate::lang::{ClassSummary, SourceModule};
use crate::stats::minmax_normalize;

/// GCS above this flags a class as a god class.
const GCS_THRESHOLD: f64 = 0.6;

/// God-class metrics for one class.
#[derive(Debug, Clone, Serialize)]
pub struct GodClassMetrics {
    pub file: String,
    pub name: String,
    pub method_count: usize,
    pub field_count: usize,
    /// Weighted methods per class: Σ cyclomatic over methods.
    pub wmc: usize,
    /// Tight class cohesion, in [0,1]; 1.0 when no method pair qualifies.
    pub tcc: f64,
    /// 0.3·n(methods) + 0.3·n(WMC) + 0.2·n(fields) + 0.2·(1−TCC).
    pub gcs: f64,
    pub flagged: bool,
}

/// God-class pipeline output, sorted by GCS descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GodClassReport {
    pub classes: Vec<GodClassMetrics>,
    pub flagged_count: usize,
}

/// Compute god-class metrics for every class in the parsed modules.
pub fn analyze(modules: &[SourceModule]) -> GodClassReport {
    let mut classes: Vec<GodClassMetrics> = Vec::new();
    for module in modules {
        for class in &module.classes {
            classes.push(GodClassMetrics {
                file: module.path.clone(),
                name: class.name.clone(),
                method_count: class.methods.len(),
                field_count: class.fields.len(),
                wmc: class
                    .methods
                    .iter()
                    .map(|m| m.function.metrics.cyclomatic)
                    .sum(),
                tcc: tight_class_cohesion(class),
                gcs: 0.0,
                flagged: false,
            });
        }
    }

    let mut methods_n: Vec<f64> = classes.iter().map(|c| c.method_count as f64).collect();
    let mut wmc_n: Vec<f64> = classes.iter().map(|c| c.wmc as f64).collect();
    let mut fields_n: Vec<f64> = classes.iter().map(|c| c.field_count as f64).collect();
    minmax_normalize(&mut methods_n);
    minmax_normalize(&mut wmc_n);
    minmax_normalize(&mut fields_n);

    for (i, c) in classes.iter_mut().enumerate() {
        c.gcs = 0.3 * methods_n[i] + 0.3 * wmc_n[i] + 0.2 * fields_n[i] + 0.2 * (1.0 - c.tcc);
        c.flagged = c.gcs > GCS_THRESHOLD;
    }

    classes.sort_by(|a, b| {
        b.gcs
            .partial_cmp(&a.gcs)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.name.cmp(&b.name))
    });

    let flagged_count = classes.iter().filter(|c| c.flagged).count();
    GodClassReport {
        classes,
        flagged_count,
    }
}

/// Fraction of method pairs sharing at least one accessed field, over the
/// pairs where both methods access any field at all. No qualifying pair
/// means cohesion cannot be measured and counts as 1.0.
fn tight_class_cohesion(class: &ClassSummary) -> f64 {
    let accessors: Vec<&std::collections::BTreeSet<String>> = class
        .methods
        .iter()
        .map(|m| &m.accessed_fields)
        .filter(|fields| !fields.is_empty())
        .collect();

    let n = accessors.len();
    if n < 2 {
        return 1.0;
    }

    let mut qualifying = 0usize;
    let mut connected = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            qualifying += 1;
            if accessors[i].intersection(accessors[j]).next().is_some() {
                connected += 1;
            }
        }
    }
    connected as f64 / qualifying as f64
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
