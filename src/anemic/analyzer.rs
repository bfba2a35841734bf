use std::collections::BTreeMap;

use serde::Serialize;

use crate::lang::{MethodSummary, SourceModule, module_token};

/// AMS above this flags a class as anemic.
const AMS_THRESHOLD: f64 = 0.5;

/// Anemic-model metrics for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub file: String,
    pub name: String,
    pub fields: usize,
    pub behavior_methods: usize,
    /// fields / (fields + behavior methods), in [0,1].
    pub dbsi: f64,
    /// 1 − methods-with-logic share among eligible methods, in [0,1].
    pub orchestration: f64,
    /// DBSI × orchestration pressure, in [0,1].
    pub ams: f64,
    /// Source files textually referencing this class's module path.
    pub touch_count: usize,
    pub flagged: bool,
}

/// Anemic pipeline output, sorted by AMS descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnemicReport {
    pub classes: Vec<ClassMetrics>,
    pub flagged_count: usize,
}

/// Compute anemic-model metrics for every class in the parsed modules.
/// `contents` maps file paths to decoded text for reference counting.
pub fn analyze(modules: &[SourceModule], contents: &BTreeMap<String, String>) -> AnemicReport {
    let mut classes: Vec<ClassMetrics> = Vec::new();

    for module in modules {
        let token = module_token(&module.path, module.language);
        let touch_count = contents
            .iter()
            .filter(|(path, text)| path.as_str() != module.path && text.contains(&token))
            .count();

        for class in &module.classes {
            let fields = class.fields.len();
            let behavior = class.methods.iter().filter(|m| is_behavior(m)).count();
            let eligible: Vec<&MethodSummary> = class
                .methods
                .iter()
                .filter(|m| !m.is_dunder && !m.is_property)
                .collect();
            let with_logic = eligible.iter().filter(|m| m.has_logic).count();

            let dbsi = if fields + behavior > 0 {
                fields as f64 / (fields + behavior) as f64
            } else {
                0.0
            };
            // A class with no eligible methods carries no logic at all;
            // its orchestration pressure is maximal.
            let orchestration = if eligible.is_empty() {
                1.0
            } else {
                1.0 - with_logic as f64 / eligible.len() as f64
            };
            let ams = dbsi * orchestration;

            classes.push(ClassMetrics {
                file: module.path.clone(),
                name: class.name.clone(),
                fields,
                behavior_methods: behavior,
                dbsi,
                orchestration,
                ams,
                touch_count,
                flagged: ams > AMS_THRESHOLD,
            });
        }
    }

    classes.sort_by(|a, b| {
        b.ams
            .partial_cmp(&a.ams)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.name.cmp(&b.name))
    });

    let flagged_count = classes.iter().filter(|c| c.flagged).count();
    AnemicReport {
        classes,
        flagged_count,
    }
}

/// Behavior method: non-trivial (has logic) and not an accessor, dunder,
/// or property.
fn is_behavior(m: &MethodSummary) -> bool {
    m.has_logic && !m.is_accessor && !m.is_dunder && !m.is_property
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
