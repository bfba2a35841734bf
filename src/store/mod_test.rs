use super::*;
use crate::model::{FileChange, summarize_commits};
use crate::{anemic, clusters, complexity, coupling, dx, effort, godclass, hotspots, knowledge, lang};
use std::collections::BTreeMap;

const T0: i64 = 1_700_000_000;

fn change(commit: &str, author: &str, path: &str, added: usize, ts: i64) -> FileChange {
    FileChange {
        commit_id: commit.to_string(),
        author: author.to_string(),
        timestamp: ts,
        path: path.to_string(),
        added,
        deleted: added / 5,
    }
}

/// Build a full report bundle from a small synthetic history.
fn sample_reports() -> RunReports {
    let mut changes = Vec::new();
    for i in 0..6 {
        let author = if i % 2 == 0 { "alice" } else { "bob" };
        changes.push(change(&format!("c{i}"), author, "core.py", 50, T0 + i * 86_400));
        changes.push(change(&format!("c{i}"), author, "api.py", 20, T0 + i * 86_400));
    }
    changes.push(change("c9", "alice", "docs.py", 5, T0));

    let reference = T0 + 6 * 86_400;
    let source = "class Core:\n    def __init__(self):\n        self.state = 0\n\n    def step(self):\n        if self.state:\n            self.state -= 1\n";
    let module = lang::parse_module("core.py", source.as_bytes()).unwrap();
    let mut contents = BTreeMap::new();
    contents.insert("core.py".to_string(), source.to_string());

    let hotspots_report = hotspots::analyze(&changes, reference);
    let knowledge_report = knowledge::analyze(&changes, reference);
    let coupling_report = coupling::analyze(&changes);
    let pain_report = coupling::pain::analyze(&changes, &coupling_report);
    let complexity_report = complexity::analyze(std::slice::from_ref(&module));
    let anemic_report = anemic::analyze(std::slice::from_ref(&module), &contents);
    let godclass_report = godclass::analyze(std::slice::from_ref(&module));
    let commits = summarize_commits(&changes);
    let cluster_report = clusters::analyze(&commits, 42);
    let effort_report = effort::analyze(&changes, &knowledge_report, &pain_report).unwrap();
    let dx_report = dx::analyze(
        &changes,
        &hotspots_report,
        &knowledge_report,
        &cluster_report,
        &complexity_report,
    );

    RunReports {
        hotspots: hotspots_report,
        knowledge: knowledge_report,
        coupling: coupling_report,
        pain: pain_report,
        complexity: complexity_report,
        anemic: anemic_report,
        godclass: godclass_report,
        clusters: cluster_report,
        effort: effort_report,
        dx: dx_report,
    }
}

fn sample_run(run_id: &str, started_at: &str, reports: &RunReports) -> Run {
    Run::summarize(
        run_id.to_string(),
        "/tmp/repo".to_string(),
        90,
        started_at.to_string(),
        format!("{started_at}+1s"),
        None,
        7,
        reports,
    )
    .unwrap()
}

#[test]
fn save_and_read_back_round_trips_by_value() {
    let mut store = RunStore::open_in_memory().unwrap();
    let reports = sample_reports();
    let run = sample_run("run-1", "2026-08-01T10:00:00Z", &reports);
    store.save(&run, &reports).unwrap();

    assert_eq!(store.get_run("run-1").unwrap(), run);

    let hotspot_rows = store.get_hotspot_files("run-1").unwrap();
    assert_eq!(hotspot_rows.len(), reports.hotspots.files.len());
    for row in &hotspot_rows {
        let original = reports
            .hotspots
            .files
            .iter()
            .find(|f| f.path == row.file_path)
            .unwrap();
        assert_eq!(row.frequency as usize, original.frequency);
        assert_eq!(row.churn as usize, original.churn);
        assert_eq!(row.hotspot_score, original.hotspot_score);
        assert_eq!(row.rework_ratio, original.rework_ratio);
    }

    let knowledge_rows = store.get_knowledge_files("run-1").unwrap();
    for row in &knowledge_rows {
        let original = reports
            .knowledge
            .files
            .iter()
            .find(|f| f.path == row.file_path)
            .unwrap();
        assert_eq!(row.kdi, original.kdi);
        assert_eq!(row.primary_author, original.primary_author);
        assert_eq!(row.is_island, original.is_island);
        assert_eq!(row.author_count as usize, original.authors.len());
    }

    let pair_rows = store.get_coupling_pairs("run-1").unwrap();
    assert_eq!(pair_rows.len(), reports.coupling.pairs.len());
    let pain_rows = store.get_file_pain("run-1").unwrap();
    assert_eq!(pain_rows.len(), reports.pain.files.len());
    let function_rows = store.get_complexity_functions("run-1").unwrap();
    assert_eq!(function_rows.len(), reports.complexity.functions.len());
    let anemic_rows = store.get_anemic_classes("run-1").unwrap();
    assert_eq!(anemic_rows.len(), reports.anemic.classes.len());
    let god_rows = store.get_god_class_classes("run-1").unwrap();
    assert_eq!(god_rows.len(), reports.godclass.classes.len());
    let cluster_rows = store.get_cluster_summaries("run-1").unwrap();
    assert_eq!(cluster_rows.len(), reports.clusters.clusters.len());
    let drift_rows = store.get_cluster_drift("run-1").unwrap();
    assert_eq!(drift_rows.len(), reports.clusters.drift.len());
    let dx_rows = store.get_dx_cognitive_files("run-1").unwrap();
    assert_eq!(dx_rows.len(), reports.dx.files.len());

    let effort_rows = store.get_effort_files("run-1").unwrap();
    for row in &effort_rows {
        let original = reports
            .effort
            .files
            .iter()
            .find(|f| f.path == row.file_path)
            .unwrap();
        assert_eq!(row.rei, original.rei);
        let stored: BTreeMap<String, f64> = serde_json::from_str(&row.contributions).unwrap();
        assert_eq!(&stored, &original.contributions);
    }
}

#[test]
fn missing_run_is_not_found() {
    let store = RunStore::open_in_memory().unwrap();
    match store.get_run("nope") {
        Err(crate::error::XrayError::NotFound(id)) => assert_eq!(id, "nope"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(
        store.get_hotspot_files("nope"),
        Err(crate::error::XrayError::NotFound(_))
    ));
    assert!(matches!(
        store.compare("nope", "nope"),
        Err(crate::error::XrayError::NotFound(_))
    ));
}

#[test]
fn list_repos_and_runs() {
    let mut store = RunStore::open_in_memory().unwrap();
    let reports = sample_reports();
    store
        .save(&sample_run("run-1", "2026-08-01T10:00:00Z", &reports), &reports)
        .unwrap();
    store
        .save(&sample_run("run-2", "2026-08-02T10:00:00Z", &reports), &reports)
        .unwrap();

    assert_eq!(store.list_repos().unwrap(), vec!["/tmp/repo"]);
    let runs = store.list_runs("/tmp/repo").unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, "run-1", "oldest first");
    assert!(store.list_runs("/elsewhere").unwrap().is_empty());
}

#[test]
fn duplicate_run_id_fails_without_partial_rows() {
    let mut store = RunStore::open_in_memory().unwrap();
    let reports = sample_reports();
    let run = sample_run("run-1", "2026-08-01T10:00:00Z", &reports);
    store.save(&run, &reports).unwrap();
    let before = store.get_hotspot_files("run-1").unwrap().len();

    assert!(store.save(&run, &reports).is_err());
    assert_eq!(store.get_hotspot_files("run-1").unwrap().len(), before);
}

#[test]
fn compare_run_with_itself_is_all_unchanged() {
    let mut store = RunStore::open_in_memory().unwrap();
    let reports = sample_reports();
    let run = sample_run("run-1", "2026-08-01T10:00:00Z", &reports);
    store.save(&run, &reports).unwrap();

    let comparison = store.compare("run-1", "run-1").unwrap();
    for (table, rows) in &comparison.tables {
        for row in rows {
            assert_eq!(
                row.status,
                ComparisonStatus::Unchanged,
                "{table}/{} changed against itself",
                row.key
            );
        }
    }
}

#[test]
fn compare_detects_improvement_and_orders_by_start() {
    let mut store = RunStore::open_in_memory().unwrap();

    // Two hand-built snapshots where big.py's hotspot drops 0.9 → 0.3.
    let mut reports_a = RunReports::default();
    reports_a.hotspots.files.push(crate::hotspots::FileMetrics {
        path: "big.py".to_string(),
        frequency: 10,
        churn: 500,
        weighted_frequency: 10.0,
        weighted_churn: 500.0,
        hotspot_score: 0.9,
        rework_ratio: 0.5,
    });
    let mut reports_b = RunReports::default();
    reports_b.hotspots.files.push(crate::hotspots::FileMetrics {
        path: "big.py".to_string(),
        frequency: 3,
        churn: 60,
        weighted_frequency: 3.0,
        weighted_churn: 60.0,
        hotspot_score: 0.3,
        rework_ratio: 0.2,
    });

    let run_a = sample_run("run-a", "2026-08-01T10:00:00Z", &reports_a);
    let run_b = sample_run("run-b", "2026-08-02T10:00:00Z", &reports_b);
    store.save(&run_a, &reports_a).unwrap();
    store.save(&run_b, &reports_b).unwrap();

    // Argument order must not matter: A is the earlier run either way.
    for (first, second) in [("run-a", "run-b"), ("run-b", "run-a")] {
        let comparison = store.compare(first, second).unwrap();
        assert_eq!(comparison.run_a.run_id, "run-a");
        let rows = &comparison.tables["hotspot_files"];
        let big = rows.iter().find(|r| r.key == "big.py").unwrap();
        assert_eq!(big.status, ComparisonStatus::Improved);
        assert!((big.delta - (-0.6)).abs() < 1e-9);
    }
}
