use serde::Serialize;

use crate::model::CommitSummary;
use crate::stats::minmax_normalize;

use super::kmeans::auto_k;

/// Label share deltas below this are considered stable, in percent.
const DRIFT_STABLE_PCT: f64 = 5.0;

/// Commit-cluster label, inferred from the centroid position in
/// normalized feature space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Feature,
    Bugfix,
    Refactoring,
    Config,
    Mixed,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Feature => "feature",
            Label::Bugfix => "bugfix",
            Label::Refactoring => "refactoring",
            Label::Config => "config",
            Label::Mixed => "mixed",
        }
    }

    pub const ALL: [Label; 5] = [
        Label::Feature,
        Label::Bugfix,
        Label::Refactoring,
        Label::Config,
        Label::Mixed,
    ];
}

/// One cluster: size, centroid in normalized feature space, label.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub size: usize,
    /// `[file_count, total_churn, add_ratio]`, normalized.
    pub centroid: Vec<f64>,
    pub label: Label,
}

/// Share drift of one label between the window's two halves, in
/// percentage points.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterDrift {
    pub label: Label,
    pub first_pct: f64,
    pub second_pct: f64,
    pub drift: f64,
    pub stable: bool,
}

/// Clustering pipeline output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterReport {
    pub clusters: Vec<ClusterSummary>,
    /// Per-commit cluster ids, parallel to the input commit stream.
    pub assignments: Vec<usize>,
    pub k: usize,
    pub silhouette: f64,
    pub drift: Vec<ClusterDrift>,
}

impl ClusterReport {
    /// Label of the cluster a commit was assigned to.
    pub fn commit_label(&self, commit_index: usize) -> Option<Label> {
        let cluster = *self.assignments.get(commit_index)?;
        self.clusters.get(cluster).map(|c| c.label)
    }
}

/// Cluster the commit stream. Deterministic under `seed`.
pub fn analyze(commits: &[CommitSummary], seed: u64) -> ClusterReport {
    if commits.is_empty() {
        return ClusterReport::default();
    }

    let points = feature_vectors(commits);
    let result = auto_k(&points, seed);

    let mut sizes = vec![0usize; result.k];
    for &a in &result.assignments {
        sizes[a] += 1;
    }
    let clusters: Vec<ClusterSummary> = result
        .centroids
        .iter()
        .enumerate()
        .map(|(id, centroid)| ClusterSummary {
            id,
            size: sizes[id],
            centroid: centroid.clone(),
            label: label_centroid(centroid),
        })
        .collect();

    let drift = label_drift(commits, &result.assignments, &clusters);

    ClusterReport {
        clusters,
        assignments: result.assignments,
        k: result.k,
        silhouette: result.silhouette,
        drift,
    }
}

/// `[file_count, total_churn, add_ratio]` per commit, each dimension
/// min-max-normalized across the commit set.
fn feature_vectors(commits: &[CommitSummary]) -> Vec<Vec<f64>> {
    let mut file_counts: Vec<f64> = commits.iter().map(|c| c.file_count as f64).collect();
    let mut churns: Vec<f64> = commits
        .iter()
        .map(|c| (c.total_added + c.total_deleted) as f64)
        .collect();
    let mut ratios: Vec<f64> = commits.iter().map(|c| c.add_ratio).collect();
    minmax_normalize(&mut file_counts);
    minmax_normalize(&mut churns);
    minmax_normalize(&mut ratios);

    (0..commits.len())
        .map(|i| vec![file_counts[i], churns[i], ratios[i]])
        .collect()
}

/// Read a label off a centroid in normalized feature space.
fn label_centroid(centroid: &[f64]) -> Label {
    let (files, churn, add_ratio) = (centroid[0], centroid[1], centroid[2]);
    if add_ratio < 0.4 && churn >= 0.6 {
        Label::Refactoring
    } else if add_ratio > 0.7 && files >= 0.5 {
        Label::Feature
    } else if files <= 0.25 && (0.4..=0.7).contains(&add_ratio) && churn <= 0.25 {
        Label::Bugfix
    } else if churn <= 0.25 && files <= 0.25 {
        Label::Config
    } else {
        Label::Mixed
    }
}

/// Split the window at its time midpoint and compare each label's share
/// of commits between the halves.
fn label_drift(
    commits: &[CommitSummary],
    assignments: &[usize],
    clusters: &[ClusterSummary],
) -> Vec<ClusterDrift> {
    let min_ts = commits.iter().map(|c| c.timestamp).min().unwrap_or(0);
    let max_ts = commits.iter().map(|c| c.timestamp).max().unwrap_or(0);
    let midpoint = min_ts + (max_ts - min_ts) / 2;

    let mut first = vec![0usize; Label::ALL.len()];
    let mut second = vec![0usize; Label::ALL.len()];
    let mut first_total = 0usize;
    let mut second_total = 0usize;

    for (commit, &cluster) in commits.iter().zip(assignments) {
        let Some(summary) = clusters.get(cluster) else {
            continue;
        };
        let slot = Label::ALL
            .iter()
            .position(|&l| l == summary.label)
            .unwrap_or(Label::ALL.len() - 1);
        if commit.timestamp <= midpoint {
            first[slot] += 1;
            first_total += 1;
        } else {
            second[slot] += 1;
            second_total += 1;
        }
    }

    let pct = |count: usize, total: usize| {
        if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };

    Label::ALL
        .iter()
        .enumerate()
        .filter(|&(i, _)| first[i] > 0 || second[i] > 0)
        .map(|(i, &label)| {
            let first_pct = pct(first[i], first_total);
            let second_pct = pct(second[i], second_total);
            let drift = second_pct - first_pct;
            ClusterDrift {
                label,
                first_pct,
                second_pct,
                drift,
                stable: drift.abs() < DRIFT_STABLE_PCT,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
