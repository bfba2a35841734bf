//! Rendering for whole-analysis output: per-pipeline narratives, stored
//! run listings, and run-to-run comparisons.

use crate::error::Result;
use crate::git::GitRepo;
use crate::report_helpers::{print_json_stdout, separator};
use crate::store::{ComparisonStatus, Run, RunComparison};
use crate::{anemic, clusters, complexity, coupling, dx, effort, godclass, hotspots, knowledge};

use super::Analysis;

fn format_day(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// One-line context header: the window against the repository's whole
/// history.
pub fn print_header(repo: &GitRepo, analysis: &Analysis) -> Result<()> {
    let total = repo.commit_count()?;
    println!(
        "Window: {}d ending {} \u{2014} {} of {} commit(s) analyzed{}",
        analysis.window_days,
        format_day(analysis.reference_time),
        analysis.commit_count,
        total,
        if analysis.empty { " (empty window)" } else { "" }
    );
    if let (Some(first), Some(last)) = (repo.first_commit_date()?, repo.last_commit_date()?) {
        println!(
            "History: {} \u{2192} {}",
            format_day(first),
            format_day(last)
        );
    }
    println!();
    Ok(())
}

/// Print the narratives (or one JSON document) for the requested
/// pipelines.
pub fn render(analysis: &Analysis, json: bool, top: usize) -> Result<()> {
    let selected = analysis.requested;
    let reports = &analysis.reports;

    if json {
        let mut doc = serde_json::Map::new();
        if selected.hotspots {
            doc.insert("hotspots".into(), serde_json::to_value(&reports.hotspots)?);
        }
        if selected.knowledge {
            doc.insert("knowledge".into(), serde_json::to_value(&reports.knowledge)?);
        }
        if selected.coupling {
            doc.insert("coupling".into(), serde_json::to_value(&reports.coupling)?);
            doc.insert("pain".into(), serde_json::to_value(&reports.pain)?);
        }
        if selected.complexity {
            doc.insert("complexity".into(), serde_json::to_value(&reports.complexity)?);
        }
        if selected.anemic {
            doc.insert("anemic".into(), serde_json::to_value(&reports.anemic)?);
        }
        if selected.god_classes {
            doc.insert("god_classes".into(), serde_json::to_value(&reports.godclass)?);
        }
        if selected.clusters {
            doc.insert("clusters".into(), serde_json::to_value(&reports.clusters)?);
        }
        if selected.effort {
            doc.insert("effort".into(), serde_json::to_value(&reports.effort)?);
        }
        if selected.dx {
            doc.insert("dx".into(), serde_json::to_value(&reports.dx)?);
        }
        return print_json_stdout(&serde_json::Value::Object(doc));
    }

    let mut first = true;
    let mut gap = |first: &mut bool| {
        if !*first {
            println!();
        }
        *first = false;
    };

    if selected.hotspots {
        gap(&mut first);
        hotspots::print_report(&reports.hotspots, top);
    }
    if selected.knowledge {
        gap(&mut first);
        knowledge::print_report(&reports.knowledge, top);
    }
    if selected.coupling {
        gap(&mut first);
        coupling::print_report(&reports.coupling, &reports.pain, top);
    }
    if selected.complexity {
        gap(&mut first);
        complexity::print_report(&reports.complexity, top);
    }
    if selected.anemic {
        gap(&mut first);
        anemic::print_report(&reports.anemic, top);
    }
    if selected.god_classes {
        gap(&mut first);
        godclass::print_report(&reports.godclass, top);
    }
    if selected.clusters {
        gap(&mut first);
        clusters::print_report(&reports.clusters);
    }
    if selected.effort {
        gap(&mut first);
        effort::print_report(&reports.effort, top);
    }
    if selected.dx {
        gap(&mut first);
        dx::print_report(&reports.dx, top);
    }
    Ok(())
}

/// Print stored runs for a repository, oldest first.
pub fn print_run_list(repo_path: &str, runs: &[Run]) {
    if runs.is_empty() {
        println!("No stored runs for {repo_path}.");
        return;
    }
    let sep = separator(100);
    println!("Stored runs for {repo_path}");
    println!("{sep}");
    println!(
        " {:<36}  {:<25} {:>7} {:>8} {:>7} {:>7}",
        "Run id", "Started", "Window", "Commits", "Files", "DX"
    );
    println!("{sep}");
    for run in runs {
        println!(
            " {:<36}  {:<25} {:>6}d {:>8} {:>7} {:>7.3}",
            run.run_id,
            run.started_at,
            run.window_days,
            run.commit_count,
            run.file_count,
            run.dx_score
        );
    }
    println!("{sep}");
}

/// Print a run-to-run comparison, one block per child table.
pub fn print_comparison(comparison: &RunComparison) {
    let sep = separator(90);
    println!(
        "Comparing {} ({}) \u{2192} {} ({})",
        comparison.run_a.run_id,
        comparison.run_a.started_at,
        comparison.run_b.run_id,
        comparison.run_b.started_at
    );

    for (table, rows) in &comparison.tables {
        if rows.is_empty() {
            continue;
        }
        let changed: Vec<_> = rows
            .iter()
            .filter(|r| r.status != ComparisonStatus::Unchanged)
            .collect();
        println!();
        println!(
            "{table} \u{2014} {} row(s), {} changed",
            rows.len(),
            changed.len()
        );
        println!("{sep}");
        for row in changed.iter().take(20) {
            let fmt = |v: Option<f64>| match v {
                Some(v) => format!("{v:.3}"),
                None => "-".to_string(),
            };
            println!(
                " {:<50} {:<9} {:>8} \u{2192} {:>8}  ({:+.3})",
                row.key,
                row.status.as_str(),
                fmt(row.a),
                fmt(row.b),
                row.delta
            );
        }
        println!("{sep}");
    }

    if !comparison.cluster_mix_a.is_empty() || !comparison.cluster_mix_b.is_empty() {
        println!();
        println!("Cluster mix");
        println!("{sep}");
        for (name, mix) in [
            (&comparison.run_a.run_id, &comparison.cluster_mix_a),
            (&comparison.run_b.run_id, &comparison.cluster_mix_b),
        ] {
            let described: Vec<String> = mix
                .iter()
                .map(|c| format!("{}:{}", c.label, c.size))
                .collect();
            println!(" {:<36}  {}", name, described.join("  "));
        }
        println!("{sep}");
    }

    for d in &comparison.drift_b {
        if !d.stable {
            println!(
                " note: '{}' share drifting in the later window ({:+.1} pts)",
                d.label, d.drift
            );
        }
    }
}
