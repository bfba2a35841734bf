use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::FileChange;
use crate::stats::{decay_weight, minmax_normalize};
use crate::util::DAY_SECONDS;

/// Half-life for change recency weighting, in days.
const CHURN_HALF_LIFE_DAYS: f64 = 30.0;

/// Two commits on the same path within this many days count as rework.
const REWORK_WINDOW_DAYS: i64 = 14;

/// Churn and frequency metrics for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileMetrics {
    pub path: String,
    pub frequency: usize,
    pub churn: usize,
    pub weighted_frequency: f64,
    pub weighted_churn: f64,
    /// minmax(weighted_churn) × minmax(weighted_frequency), in [0,1].
    pub hotspot_score: f64,
    /// Fraction of this file's commits within 14 days of another commit
    /// on the same path.
    pub rework_ratio: f64,
}

/// How many files cover 50/80/90 % of total churn.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ParetoBuckets {
    pub files_for_50_pct: usize,
    pub files_for_80_pct: usize,
    pub files_for_90_pct: usize,
}

/// Hotspot pipeline output. Files are sorted by score descending,
/// path ascending on ties; zero-churn files are excluded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HotspotReport {
    pub files: Vec<FileMetrics>,
    pub pareto: ParetoBuckets,
    pub total_churn: usize,
}

struct FileAccum {
    frequency: usize,
    churn: usize,
    weighted_frequency: f64,
    weighted_churn: f64,
    timestamps: Vec<i64>,
}

/// Compute hotspot metrics from a change stream against a reference time.
/// An empty stream yields an empty report.
pub fn analyze(changes: &[FileChange], reference_time: i64) -> HotspotReport {
    // BTreeMap keeps per-file iteration lexicographic, which makes the
    // tie-break deterministic without a second sort key pass.
    let mut accum: BTreeMap<&str, FileAccum> = BTreeMap::new();

    for change in changes {
        let age_days = (reference_time - change.timestamp) as f64 / DAY_SECONDS as f64;
        let weight = decay_weight(age_days, CHURN_HALF_LIFE_DAYS);
        let entry = accum.entry(change.path.as_str()).or_insert(FileAccum {
            frequency: 0,
            churn: 0,
            weighted_frequency: 0.0,
            weighted_churn: 0.0,
            timestamps: Vec::new(),
        });
        entry.frequency += 1;
        entry.churn += change.churn();
        entry.weighted_frequency += weight;
        entry.weighted_churn += weight * change.churn() as f64;
        entry.timestamps.push(change.timestamp);
    }

    let mut files: Vec<FileMetrics> = accum
        .into_iter()
        .filter(|(_, a)| a.churn > 0)
        .map(|(path, a)| FileMetrics {
            path: path.to_string(),
            frequency: a.frequency,
            churn: a.churn,
            weighted_frequency: a.weighted_frequency,
            weighted_churn: a.weighted_churn,
            hotspot_score: 0.0,
            rework_ratio: rework_ratio(&a.timestamps),
        })
        .collect();

    let mut churn_norm: Vec<f64> = files.iter().map(|f| f.weighted_churn).collect();
    let mut freq_norm: Vec<f64> = files.iter().map(|f| f.weighted_frequency).collect();
    minmax_normalize(&mut churn_norm);
    minmax_normalize(&mut freq_norm);
    for (i, f) in files.iter_mut().enumerate() {
        f.hotspot_score = churn_norm[i] * freq_norm[i];
    }

    let total_churn: usize = files.iter().map(|f| f.churn).sum();
    let pareto = pareto_buckets(&files, total_churn);

    // Score descending; the map iteration already ordered paths ascending,
    // and the sort is stable.
    files.sort_by(|a, b| {
        b.hotspot_score
            .partial_cmp(&a.hotspot_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    HotspotReport {
        files,
        pareto,
        total_churn,
    }
}

/// Fraction of commits within `REWORK_WINDOW_DAYS` of another commit on
/// the same path. Falls back to `(n-1)/n` when timestamps are absent
/// (all zero), since ordering alone still implies repeated edits.
/// Also feeds the effort label, which shares the same rework notion.
pub(crate) fn rework_ratio(timestamps: &[i64]) -> f64 {
    let n = timestamps.len();
    if n < 2 {
        return 0.0;
    }
    if timestamps.iter().all(|&t| t == 0) {
        return (n - 1) as f64 / n as f64;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    let window = REWORK_WINDOW_DAYS * DAY_SECONDS;
    let near_another = sorted
        .iter()
        .enumerate()
        .filter(|&(i, &t)| {
            let prev_near = i > 0 && t - sorted[i - 1] <= window;
            let next_near = i + 1 < sorted.len() && sorted[i + 1] - t <= window;
            prev_near || next_near
        })
        .count();
    near_another as f64 / n as f64
}

/// Count how many of the highest-churn files it takes to cover 50/80/90 %
/// of total churn.
fn pareto_buckets(files: &[FileMetrics], total_churn: usize) -> ParetoBuckets {
    if total_churn == 0 {
        return ParetoBuckets::default();
    }
    let mut churns: Vec<usize> = files.iter().map(|f| f.churn).collect();
    churns.sort_unstable_by(|a, b| b.cmp(a));

    let count_until = |pct: f64| -> usize {
        let target = total_churn as f64 * pct;
        let mut cumulative = 0usize;
        for (i, &c) in churns.iter().enumerate() {
            cumulative += c;
            if cumulative as f64 >= target {
                return i + 1;
            }
        }
        churns.len()
    };

    ParetoBuckets {
        files_for_50_pct: count_until(0.5),
        files_for_80_pct: count_until(0.8),
        files_for_90_pct: count_until(0.9),
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
