use super::*;
use crate::model::CommitSummary;

const T0: i64 = 1_700_000_000;

fn commit(id: usize, files: usize, added: usize, deleted: usize, ts: i64) -> CommitSummary {
    let churn = added + deleted;
    CommitSummary {
        commit_id: format!("c{id}"),
        author: "alice".to_string(),
        timestamp: ts,
        file_count: files,
        total_added: added,
        total_deleted: deleted,
        add_ratio: if churn > 0 {
            added as f64 / churn as f64
        } else {
            0.5
        },
    }
}

/// Three well-separated kinds of work: broad additive commits, tiny
/// balanced fixes, and deletion-heavy rewrites.
fn mixed_history() -> Vec<CommitSummary> {
    let mut commits = Vec::new();
    let mut id = 0;
    for i in 0..5 {
        commits.push(commit(id, 8, 190 + i, 10, T0 + id as i64 * 100));
        id += 1;
    }
    for i in 0..5 {
        commits.push(commit(id, 1, 5 + i, 5, T0 + id as i64 * 100));
        id += 1;
    }
    for i in 0..5 {
        commits.push(commit(id, 4, 60, 240 + i, T0 + id as i64 * 100));
        id += 1;
    }
    commits
}

#[test]
fn separates_and_labels_three_kinds_of_work() {
    let report = analyze(&mixed_history(), 42);

    assert_eq!(report.k, 3);
    let labels: Vec<Label> = report.clusters.iter().map(|c| c.label).collect();
    assert!(labels.contains(&Label::Feature), "labels: {labels:?}");
    assert!(labels.contains(&Label::Bugfix), "labels: {labels:?}");
    assert!(labels.contains(&Label::Refactoring), "labels: {labels:?}");

    // Cluster sizes add up to the commit count.
    let total: usize = report.clusters.iter().map(|c| c.size).sum();
    assert_eq!(total, 15);
    assert_eq!(report.assignments.len(), 15);
}

#[test]
fn identical_input_and_seed_reproduce_bit_for_bit() {
    let commits = mixed_history();
    let a = analyze(&commits, 7);
    let b = analyze(&commits, 7);
    assert_eq!(a.assignments, b.assignments);
    assert_eq!(a.k, b.k);
    assert_eq!(a.silhouette, b.silhouette);
}

#[test]
fn commit_label_follows_assignment() {
    let report = analyze(&mixed_history(), 42);
    for i in 0..15 {
        let label = report.commit_label(i).unwrap();
        let cluster = report.assignments[i];
        assert_eq!(label, report.clusters[cluster].label);
    }
    assert!(report.commit_label(99).is_none());
}

#[test]
fn drift_detects_shift_between_halves() {
    // First half: broad additive work. Second half: tiny balanced fixes.
    let mut commits = Vec::new();
    for i in 0..6 {
        commits.push(commit(i, 8, 200, 10, T0 + i as i64));
    }
    for i in 6..12 {
        commits.push(commit(i, 1, 5, 5, T0 + 1_000_000 + i as i64));
    }
    let report = analyze(&commits, 42);

    let feature = report
        .drift
        .iter()
        .find(|d| d.label == Label::Feature)
        .expect("feature drift row");
    assert!(feature.drift < -50.0, "feature share should collapse");
    assert!(!feature.stable);

    let bugfix = report
        .drift
        .iter()
        .find(|d| d.label == Label::Bugfix)
        .expect("bugfix drift row");
    assert!(bugfix.drift > 50.0);
    assert!(!bugfix.stable);
}

#[test]
fn steady_history_is_stable() {
    // The same mix in both halves.
    let mut commits = Vec::new();
    for half in 0..2 {
        let base = T0 + half * 1_000_000;
        for i in 0..4 {
            let id = (half * 8 + i) as usize;
            commits.push(commit(id, 8, 200, 10, base + i));
        }
        for i in 4..8 {
            let id = (half * 8 + i) as usize;
            commits.push(commit(id, 1, 5, 5, base + i));
        }
    }
    let report = analyze(&commits, 42);
    for row in &report.drift {
        assert!(row.stable, "{:?} drifted {}", row.label, row.drift);
    }
}

#[test]
fn empty_stream_degrades_to_empty_report() {
    let report = analyze(&[], 42);
    assert_eq!(report.k, 0);
    assert!(report.clusters.is_empty());
    assert!(report.drift.is_empty());
}
