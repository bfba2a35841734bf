use super::*;

const T0: i64 = 1_700_000_000;

fn change(commit: &str, path: &str, added: usize, deleted: usize, ts: i64) -> FileChange {
    FileChange {
        commit_id: commit.to_string(),
        author: "alice@test.com".to_string(),
        timestamp: ts,
        path: path.to_string(),
        added,
        deleted,
    }
}

/// Three-file repo: `a.py` changed 10 times (+10/-5 each), `b.py` once
/// (+100/-0), `c.py` untouched.
fn three_file_history() -> Vec<FileChange> {
    let mut changes = Vec::new();
    for i in 0..10 {
        changes.push(change(&format!("c{i}"), "a.py", 10, 5, T0));
    }
    changes.push(change("c10", "b.py", 100, 0, T0));
    changes
}

#[test]
fn hotspot_three_file_repo() {
    let report = analyze(&three_file_history(), T0);

    assert_eq!(report.files.len(), 2, "untouched c.py must be absent");

    let a = report.files.iter().find(|f| f.path == "a.py").unwrap();
    assert_eq!(a.frequency, 10);
    assert_eq!(a.churn, 150);
    assert_eq!(a.hotspot_score, 1.0);

    let b = report.files.iter().find(|f| f.path == "b.py").unwrap();
    assert!(b.hotspot_score < a.hotspot_score);

    // a.py leads the ranking
    assert_eq!(report.files[0].path, "a.py");
}

#[test]
fn scores_stay_in_unit_interval() {
    let report = analyze(&three_file_history(), T0);
    for f in &report.files {
        assert!(f.hotspot_score >= 0.0 && f.hotspot_score <= 1.0);
        assert!(f.rework_ratio >= 0.0 && f.rework_ratio <= 1.0);
        assert!(f.hotspot_score.is_finite());
    }
}

#[test]
fn zero_churn_files_are_excluded() {
    let changes = vec![
        change("c1", "touched.py", 5, 0, T0),
        change("c2", "empty.py", 0, 0, T0),
    ];
    let report = analyze(&changes, T0);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, "touched.py");
}

#[test]
fn decay_weights_recent_churn_higher() {
    // Same raw churn, but one file's change is 90 days stale.
    let changes = vec![
        change("c1", "recent.py", 50, 0, T0),
        change("c2", "stale.py", 50, 0, T0 - 90 * 86_400),
        change("c3", "recent.py", 50, 0, T0),
        change("c4", "stale.py", 50, 0, T0 - 90 * 86_400),
    ];
    let report = analyze(&changes, T0);
    let recent = report.files.iter().find(|f| f.path == "recent.py").unwrap();
    let stale = report.files.iter().find(|f| f.path == "stale.py").unwrap();
    assert!(recent.weighted_churn > stale.weighted_churn);
    assert!(recent.hotspot_score > stale.hotspot_score);
}

#[test]
fn rework_counts_commits_close_in_time() {
    // Two commits 5 days apart (rework) and one 60 days away (not).
    let changes = vec![
        change("c1", "a.py", 1, 0, T0),
        change("c2", "a.py", 1, 0, T0 + 5 * 86_400),
        change("c3", "a.py", 1, 0, T0 + 65 * 86_400),
    ];
    let report = analyze(&changes, T0 + 65 * 86_400);
    let a = &report.files[0];
    assert!((a.rework_ratio - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn rework_fallback_without_timestamps() {
    let changes = vec![
        change("c1", "a.py", 1, 0, 0),
        change("c2", "a.py", 1, 0, 0),
        change("c3", "a.py", 1, 0, 0),
        change("c4", "a.py", 1, 0, 0),
    ];
    let report = analyze(&changes, 0);
    assert!((report.files[0].rework_ratio - 0.75).abs() < 1e-12);
}

#[test]
fn pareto_buckets_never_exceed_file_count() {
    let report = analyze(&three_file_history(), T0);
    let n = report.files.len();
    assert!(report.pareto.files_for_50_pct <= n);
    assert!(report.pareto.files_for_80_pct <= n);
    assert!(report.pareto.files_for_90_pct <= n);
    assert!(report.pareto.files_for_50_pct <= report.pareto.files_for_80_pct);
    assert!(report.pareto.files_for_80_pct <= report.pareto.files_for_90_pct);
}

#[test]
fn pareto_concentration_on_one_file() {
    // 250 total churn: a.py has 150 (60%), b.py has 100.
    let report = analyze(&three_file_history(), T0);
    assert_eq!(report.total_churn, 250);
    assert_eq!(report.pareto.files_for_50_pct, 1);
    assert_eq!(report.pareto.files_for_80_pct, 2);
}

#[test]
fn empty_stream_degrades_to_empty_report() {
    let report = analyze(&[], T0);
    assert!(report.files.is_empty());
    assert_eq!(report.total_churn, 0);
    assert_eq!(report.pareto.files_for_90_pct, 0);
}
