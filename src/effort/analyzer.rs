use std::collections::BTreeMap;

use serde::Serialize;

use crate::coupling::PainReport;
use crate::error::Result;
use crate::hotspots::rework_ratio;
use crate::knowledge::KnowledgeReport;
use crate::model::FileChange;
use crate::stats::{median, minmax_normalize};
use crate::util::DAY_SECONDS;

use super::ridge;

/// Feature order used for coefficients and per-file attributions.
pub const FEATURE_NAMES: [&str; 6] = [
    "churn",
    "frequency",
    "pain",
    "knowledge",
    "authors",
    "knowledge_pain",
];

/// Below this many files the model falls back to uniform coefficients.
const MIN_FILES_FOR_FIT: usize = 3;

/// Relative Effort Index and attribution for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEffort {
    pub path: String,
    /// minmax(X·β), in [0,1].
    pub rei: f64,
    /// β ⊙ x per feature; sums to the raw (pre-normalization) prediction.
    pub contributions: BTreeMap<String, f64>,
}

/// Effort pipeline output, sorted by REI descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EffortReport {
    pub files: Vec<FileEffort>,
    pub coefficients: BTreeMap<String, f64>,
    pub alpha: f64,
    pub r_squared: f64,
    /// True when the fallback model (too few files) was used.
    pub fallback: bool,
}

struct FileRow {
    path: String,
    churn: f64,
    frequency: f64,
    timestamps: Vec<i64>,
}

/// Fit the effort model over the window's files.
///
/// Features per file: churn, frequency, PAIN, knowledge concentration
/// (KDI), author count, and the knowledge×pain interaction — each
/// min-max-normalized. The label blends commit density with rework.
pub fn analyze(
    changes: &[FileChange],
    knowledge: &KnowledgeReport,
    pain: &PainReport,
) -> Result<EffortReport> {
    let mut rows: BTreeMap<&str, FileRow> = BTreeMap::new();
    for change in changes {
        let row = rows.entry(change.path.as_str()).or_insert_with(|| FileRow {
            path: change.path.clone(),
            churn: 0.0,
            frequency: 0.0,
            timestamps: Vec::new(),
        });
        row.churn += change.churn() as f64;
        row.frequency += 1.0;
        row.timestamps.push(change.timestamp);
    }
    let rows: Vec<FileRow> = rows.into_values().collect();
    if rows.is_empty() {
        return Ok(EffortReport::default());
    }

    let kdi_by_path: BTreeMap<&str, f64> = knowledge
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.kdi))
        .collect();
    let authors_by_path: BTreeMap<&str, f64> = knowledge
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.authors.len() as f64))
        .collect();
    let pain_by_path: BTreeMap<&str, f64> = pain
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.pain))
        .collect();

    // Six feature columns, each normalized across the file set.
    let lookup = |map: &BTreeMap<&str, f64>, path: &str| map.get(path).copied().unwrap_or(0.0);
    let mut columns: [Vec<f64>; 6] = [
        rows.iter().map(|r| r.churn).collect(),
        rows.iter().map(|r| r.frequency).collect(),
        rows.iter().map(|r| lookup(&pain_by_path, &r.path)).collect(),
        rows.iter().map(|r| lookup(&kdi_by_path, &r.path)).collect(),
        rows.iter()
            .map(|r| lookup(&authors_by_path, &r.path))
            .collect(),
        rows.iter()
            .map(|r| lookup(&kdi_by_path, &r.path) * lookup(&pain_by_path, &r.path))
            .collect(),
    ];
    for column in &mut columns {
        minmax_normalize(column);
    }
    let x: Vec<Vec<f64>> = (0..rows.len())
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect();

    // Label: commit density blended with rework, both normalized.
    let mut densities: Vec<f64> = rows.iter().map(|r| commit_density(&r.timestamps)).collect();
    let mut reworks: Vec<f64> = rows.iter().map(|r| rework_ratio(&r.timestamps)).collect();
    minmax_normalize(&mut densities);
    minmax_normalize(&mut reworks);
    let y: Vec<f64> = densities
        .iter()
        .zip(&reworks)
        .map(|(d, r)| 0.5 * d + 0.5 * r)
        .collect();

    if rows.len() < MIN_FILES_FOR_FIT {
        return Ok(fallback_report(&rows, &x, &y));
    }

    let (alpha, beta) = ridge::fit_cv(&x, &y)?;
    let raw: Vec<f64> = x.iter().map(|row| ridge::predict(row, &beta)).collect();
    let r_squared = ridge::r_squared(&y, &raw);

    let mut rei = raw.clone();
    minmax_normalize(&mut rei);

    let mut files: Vec<FileEffort> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| FileEffort {
            path: row.path.clone(),
            rei: rei[i],
            contributions: FEATURE_NAMES
                .iter()
                .zip(x[i].iter().zip(&beta))
                .map(|(&name, (feat, coef))| (name.to_string(), feat * coef))
                .collect(),
        })
        .collect();
    files.sort_by(|a, b| {
        b.rei
            .partial_cmp(&a.rei)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(EffortReport {
        files,
        coefficients: FEATURE_NAMES
            .iter()
            .zip(&beta)
            .map(|(&name, &b)| (name.to_string(), b))
            .collect(),
        alpha,
        r_squared,
        fallback: false,
    })
}

/// Uniform model for tiny file sets: every coefficient 1/k, REI is the
/// label itself, R² = 0.
fn fallback_report(rows: &[FileRow], x: &[Vec<f64>], y: &[f64]) -> EffortReport {
    let k = FEATURE_NAMES.len() as f64;
    let files = rows
        .iter()
        .enumerate()
        .map(|(i, row)| FileEffort {
            path: row.path.clone(),
            rei: y[i].clamp(0.0, 1.0),
            contributions: FEATURE_NAMES
                .iter()
                .zip(&x[i])
                .map(|(&name, &feat)| (name.to_string(), feat / k))
                .collect(),
        })
        .collect();
    EffortReport {
        files,
        coefficients: FEATURE_NAMES
            .iter()
            .map(|&name| (name.to_string(), 1.0 / k))
            .collect(),
        alpha: 0.0,
        r_squared: 0.0,
        fallback: true,
    }
}

/// `1 / (1 + median days between commits)`; a single-commit file has no
/// intervals and counts as maximally dense before normalization.
pub(crate) fn commit_density(timestamps: &[i64]) -> f64 {
    if timestamps.len() < 2 {
        return 1.0;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    let intervals: Vec<f64> = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64 / DAY_SECONDS as f64)
        .collect();
    1.0 / (1.0 + median(&intervals))
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
