//! Row-level comparison of two persisted runs.
//!
//! Child rows are joined on their natural key and classified as
//! unchanged / improved / degraded / new / removed. Every compared
//! metric here improves when it drops (for KDI that is the spec'd
//! reading: rising concentration is degradation).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;

use super::{ClusterRow, DriftRow, Run, RunStore};

/// Deltas smaller than this count as unchanged.
const DELTA_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Unchanged,
    Improved,
    Degraded,
    New,
    Removed,
}

impl ComparisonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonStatus::Unchanged => "unchanged",
            ComparisonStatus::Improved => "improved",
            ComparisonStatus::Degraded => "degraded",
            ComparisonStatus::New => "new",
            ComparisonStatus::Removed => "removed",
        }
    }
}

/// One joined row: the natural key, the tracked metric in both runs,
/// and the resulting status.
#[derive(Debug, Clone, Serialize)]
pub struct RowDelta {
    pub key: String,
    pub metric: &'static str,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub delta: f64,
    pub status: ComparisonStatus,
}

/// Comparison of two runs across all per-file child tables, plus the
/// cluster mix on both sides (labels aren't file-keyed, so they are
/// shown side by side rather than joined).
#[derive(Debug, Clone, Serialize)]
pub struct RunComparison {
    pub run_a: Run,
    pub run_b: Run,
    /// Table name → joined row deltas.
    pub tables: BTreeMap<String, Vec<RowDelta>>,
    pub cluster_mix_a: Vec<ClusterRow>,
    pub cluster_mix_b: Vec<ClusterRow>,
    /// Label drift within the later run's window.
    pub drift_b: Vec<DriftRow>,
}

pub(super) fn compare(store: &RunStore, run_a: &str, run_b: &str) -> Result<RunComparison> {
    let mut a = store.get_run(run_a)?;
    let mut b = store.get_run(run_b)?;
    // Comparisons are ordered by start time: A is always the earlier run.
    if b.started_at < a.started_at {
        std::mem::swap(&mut a, &mut b);
    }

    let mut tables = BTreeMap::new();
    tables.insert(
        "hotspot_files".to_string(),
        join(
            "hotspot_score",
            store
                .get_hotspot_files(&a.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.hotspot_score)),
            store
                .get_hotspot_files(&b.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.hotspot_score)),
        ),
    );
    tables.insert(
        "knowledge_files".to_string(),
        join(
            "kdi",
            store
                .get_knowledge_files(&a.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.kdi)),
            store
                .get_knowledge_files(&b.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.kdi)),
        ),
    );
    tables.insert(
        "coupling_pairs".to_string(),
        join(
            "jaccard",
            store
                .get_coupling_pairs(&a.run_id)?
                .into_iter()
                .map(|r| (format!("{} \u{2194} {}", r.file_a, r.file_b), r.jaccard)),
            store
                .get_coupling_pairs(&b.run_id)?
                .into_iter()
                .map(|r| (format!("{} \u{2194} {}", r.file_a, r.file_b), r.jaccard)),
        ),
    );
    tables.insert(
        "file_pain".to_string(),
        join(
            "pain",
            store
                .get_file_pain(&a.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.pain)),
            store
                .get_file_pain(&b.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.pain)),
        ),
    );
    tables.insert(
        "effort_files".to_string(),
        join(
            "rei",
            store
                .get_effort_files(&a.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.rei)),
            store
                .get_effort_files(&b.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.rei)),
        ),
    );
    tables.insert(
        "complexity_functions".to_string(),
        join(
            "cyclomatic",
            store
                .get_complexity_functions(&a.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.function_name), r.cyclomatic as f64)),
            store
                .get_complexity_functions(&b.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.function_name), r.cyclomatic as f64)),
        ),
    );
    tables.insert(
        "anemic_classes".to_string(),
        join(
            "ams",
            store
                .get_anemic_classes(&a.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.class_name), r.ams)),
            store
                .get_anemic_classes(&b.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.class_name), r.ams)),
        ),
    );
    tables.insert(
        "god_class_classes".to_string(),
        join(
            "gcs",
            store
                .get_god_class_classes(&a.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.class_name), r.gcs)),
            store
                .get_god_class_classes(&b.run_id)?
                .into_iter()
                .map(|r| (format!("{}::{}", r.file_path, r.class_name), r.gcs)),
        ),
    );
    tables.insert(
        "dx_cognitive_files".to_string(),
        join(
            "cognitive_load",
            store
                .get_dx_cognitive_files(&a.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.cognitive_load)),
            store
                .get_dx_cognitive_files(&b.run_id)?
                .into_iter()
                .map(|r| (r.file_path, r.cognitive_load)),
        ),
    );

    let cluster_mix_a = store.get_cluster_summaries(&a.run_id)?;
    let cluster_mix_b = store.get_cluster_summaries(&b.run_id)?;
    let drift_b = store.get_cluster_drift(&b.run_id)?;

    Ok(RunComparison {
        run_a: a,
        run_b: b,
        tables,
        cluster_mix_a,
        cluster_mix_b,
        drift_b,
    })
}

/// Full outer join on the natural key; delta = B − A where both exist.
fn join(
    metric: &'static str,
    a_rows: impl Iterator<Item = (String, f64)>,
    b_rows: impl Iterator<Item = (String, f64)>,
) -> Vec<RowDelta> {
    let a_map: BTreeMap<String, f64> = a_rows.collect();
    let b_map: BTreeMap<String, f64> = b_rows.collect();

    let mut deltas: Vec<RowDelta> = Vec::new();
    for (key, &a_value) in &a_map {
        match b_map.get(key) {
            Some(&b_value) => {
                let delta = b_value - a_value;
                let status = if delta.abs() < DELTA_EPSILON {
                    ComparisonStatus::Unchanged
                } else if delta < 0.0 {
                    ComparisonStatus::Improved
                } else {
                    ComparisonStatus::Degraded
                };
                deltas.push(RowDelta {
                    key: key.clone(),
                    metric,
                    a: Some(a_value),
                    b: Some(b_value),
                    delta,
                    status,
                });
            }
            None => deltas.push(RowDelta {
                key: key.clone(),
                metric,
                a: Some(a_value),
                b: None,
                delta: 0.0,
                status: ComparisonStatus::Removed,
            }),
        }
    }
    for (key, &b_value) in &b_map {
        if !a_map.contains_key(key) {
            deltas.push(RowDelta {
                key: key.clone(),
                metric,
                a: None,
                b: Some(b_value),
                delta: 0.0,
                status: ComparisonStatus::New,
            });
        }
    }
    deltas.sort_by(|x, y| {
        y.delta
            .abs()
            .partial_cmp(&x.delta.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| x.key.cmp(&y.key))
    });
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_classifies_all_statuses() {
        let a = vec![
            ("same.py".to_string(), 0.5),
            ("better.py".to_string(), 0.9),
            ("worse.py".to_string(), 0.1),
            ("gone.py".to_string(), 0.4),
        ];
        let b = vec![
            ("same.py".to_string(), 0.5),
            ("better.py".to_string(), 0.3),
            ("worse.py".to_string(), 0.7),
            ("fresh.py".to_string(), 0.2),
        ];
        let deltas = join("hotspot_score", a.into_iter(), b.into_iter());
        let by_key = |k: &str| deltas.iter().find(|d| d.key == k).unwrap();

        assert_eq!(by_key("same.py").status, ComparisonStatus::Unchanged);
        assert_eq!(by_key("better.py").status, ComparisonStatus::Improved);
        assert!((by_key("better.py").delta - (-0.6)).abs() < 1e-12);
        assert_eq!(by_key("worse.py").status, ComparisonStatus::Degraded);
        assert_eq!(by_key("gone.py").status, ComparisonStatus::Removed);
        assert_eq!(by_key("fresh.py").status, ComparisonStatus::New);
    }

    #[test]
    fn join_sorts_by_magnitude() {
        let a = vec![("x.py".to_string(), 0.1), ("y.py".to_string(), 0.1)];
        let b = vec![("x.py".to_string(), 0.2), ("y.py".to_string(), 0.9)];
        let deltas = join("pain", a.into_iter(), b.into_iter());
        assert_eq!(deltas[0].key, "y.py");
    }
}
