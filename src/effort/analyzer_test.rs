use super::*;
use crate::coupling;
use crate::knowledge;

const T0: i64 = 1_700_000_000;

fn change(commit: &str, author: &str, path: &str, added: usize, ts: i64) -> FileChange {
    FileChange {
        commit_id: commit.to_string(),
        author: author.to_string(),
        timestamp: ts,
        path: path.to_string(),
        added,
        deleted: added / 4,
    }
}

/// A history with one churn-heavy, frequently reworked file and several
/// quieter ones.
fn history() -> Vec<FileChange> {
    let mut changes = Vec::new();
    // engine.py: 8 commits in quick succession, big churn
    for i in 0..8 {
        changes.push(change(
            &format!("e{i}"),
            if i % 2 == 0 { "alice" } else { "bob" },
            "engine.py",
            80,
            T0 + i * 2 * 86_400,
        ));
    }
    // util.py co-changes with engine.py sometimes
    for i in 0..4 {
        changes.push(change(&format!("e{i}"), "alice", "util.py", 10, T0 + i * 2 * 86_400));
    }
    // docs.py: two sleepy commits far apart
    changes.push(change("d0", "carol", "docs.py", 5, T0));
    changes.push(change("d1", "carol", "docs.py", 5, T0 + 120 * 86_400));
    // config.py: single touch
    changes.push(change("c0", "alice", "config.py", 2, T0));
    changes
}

fn run(changes: &[FileChange]) -> EffortReport {
    let knowledge_report = knowledge::analyze(changes, T0 + 200 * 86_400);
    let coupling_report = coupling::analyze(changes);
    let pain_report = coupling::pain::analyze(changes, &coupling_report);
    analyze(changes, &knowledge_report, &pain_report).unwrap()
}

#[test]
fn rei_is_normalized_and_ranked() {
    let report = run(&history());
    assert!(!report.fallback);
    assert_eq!(report.files.len(), 4);
    for f in &report.files {
        assert!((0.0..=1.0).contains(&f.rei), "{}: {}", f.path, f.rei);
        assert!(f.rei.is_finite());
    }
    // REI is min-max-normalized, so the top file sits at exactly 1.0.
    assert_eq!(report.files[0].rei, 1.0);
    // The churn-heavy, reworked file clearly outranks the sleepy one.
    let engine = report.files.iter().find(|f| f.path == "engine.py").unwrap();
    let docs = report.files.iter().find(|f| f.path == "docs.py").unwrap();
    assert!(engine.rei > docs.rei);
}

#[test]
fn every_coefficient_is_surfaced() {
    let report = run(&history());
    assert_eq!(report.coefficients.len(), FEATURE_NAMES.len());
    for name in FEATURE_NAMES {
        assert!(report.coefficients.contains_key(name), "missing {name}");
    }
    assert!(ridge::ALPHA_GRID.contains(&report.alpha));
    assert!(report.r_squared.is_finite());
    assert!(report.r_squared <= 1.0);
}

#[test]
fn contributions_decompose_the_prediction() {
    let report = run(&history());
    let coefs = &report.coefficients;
    for f in &report.files {
        // Each contribution is feature × coefficient; none exceed the
        // coefficient's magnitude since features are in [0,1].
        for (name, value) in &f.contributions {
            assert!(value.abs() <= coefs[name].abs() + 1e-12);
        }
        assert_eq!(f.contributions.len(), FEATURE_NAMES.len());
    }
}

#[test]
fn tiny_file_sets_use_the_fallback_model() {
    let changes = vec![
        change("c0", "alice", "a.py", 10, T0),
        change("c1", "alice", "b.py", 10, T0),
    ];
    let report = run(&changes);
    assert!(report.fallback);
    assert_eq!(report.r_squared, 0.0);
    for (_, coef) in &report.coefficients {
        assert!((coef - 1.0 / 6.0).abs() < 1e-12);
    }
    for f in &report.files {
        assert!((0.0..=1.0).contains(&f.rei));
    }
}

#[test]
fn empty_stream_degrades_to_empty_report() {
    let report = run(&[]);
    assert!(report.files.is_empty());
    assert!(report.coefficients.is_empty());
}
