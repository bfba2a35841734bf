//! Per-file PAIN composite: Size × Distance × Volatility.
//!
//! Size is churn, Volatility is change frequency, Distance is the mean
//! Jaccard coupling of the file's pairs (0 for an isolated file). Each
//! factor is min-max-normalized across the window's file set, so PAIN is
//! only comparable within a run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::FileChange;
use crate::stats::minmax_normalize;

use super::CouplingReport;

/// PAIN factors and composite for one file, all in [0,1].
#[derive(Debug, Clone, Serialize)]
pub struct FilePain {
    pub path: String,
    pub size_norm: f64,
    pub distance_norm: f64,
    pub volatility_norm: f64,
    pub pain: f64,
}

/// PAIN pipeline output, sorted by pain descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PainReport {
    pub files: Vec<FilePain>,
}

/// Compute PAIN for every file in the change stream, using an
/// already-computed coupling report for the Distance factor.
pub fn analyze(changes: &[FileChange], coupling: &CouplingReport) -> PainReport {
    let mut size: BTreeMap<&str, f64> = BTreeMap::new();
    let mut volatility: BTreeMap<&str, f64> = BTreeMap::new();
    for change in changes {
        *size.entry(change.path.as_str()).or_insert(0.0) += change.churn() as f64;
        *volatility.entry(change.path.as_str()).or_insert(0.0) += 1.0;
    }

    let mut jaccard_sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for pair in &coupling.pairs {
        for file in [pair.file_a.as_str(), pair.file_b.as_str()] {
            let (sum, count) = jaccard_sums.entry(file).or_insert((0.0, 0));
            *sum += pair.jaccard;
            *count += 1;
        }
    }

    let paths: Vec<&str> = size.keys().copied().collect();
    let mut sizes: Vec<f64> = paths.iter().map(|p| size[p]).collect();
    let mut volatilities: Vec<f64> = paths.iter().map(|p| volatility[p]).collect();
    let mut distances: Vec<f64> = paths
        .iter()
        .map(|p| {
            jaccard_sums
                .get(p)
                .map(|&(sum, count)| sum / count as f64)
                .unwrap_or(0.0)
        })
        .collect();
    minmax_normalize(&mut sizes);
    minmax_normalize(&mut volatilities);
    minmax_normalize(&mut distances);

    let mut files: Vec<FilePain> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| FilePain {
            path: p.to_string(),
            size_norm: sizes[i],
            distance_norm: distances[i],
            volatility_norm: volatilities[i],
            pain: sizes[i] * distances[i] * volatilities[i],
        })
        .collect();

    files.sort_by(|a, b| {
        b.pain
            .partial_cmp(&a.pain)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    PainReport { files }
}
