use crate::report_helpers::{print_json_stdout, separator};

use super::ClusterReport;

pub fn print_report(report: &ClusterReport) {
    if report.clusters.is_empty() {
        println!("No commits to cluster (empty window).");
        return;
    }

    let sep = separator(78);
    println!(
        "Commit clusters (k = {}, silhouette = {:.3})",
        report.k, report.silhouette
    );
    println!("{sep}");
    println!(
        " {:>2}  {:<12} {:>5}  {:>8} {:>8} {:>9}",
        "Id", "Label", "Size", "Files", "Churn", "AddRatio"
    );
    println!("{sep}");
    for c in &report.clusters {
        println!(
            " {:>2}  {:<12} {:>5}  {:>8.3} {:>8.3} {:>9.3}",
            c.id,
            c.label.as_str(),
            c.size,
            c.centroid.first().copied().unwrap_or(0.0),
            c.centroid.get(1).copied().unwrap_or(0.0),
            c.centroid.get(2).copied().unwrap_or(0.0),
        );
    }
    println!("{sep}");

    if !report.drift.is_empty() {
        println!();
        println!("Label drift (first half \u{2192} second half)");
        println!("{sep}");
        for d in &report.drift {
            println!(
                " {:<12} {:>6.1}% \u{2192} {:>6.1}%  ({:+.1} pts, {})",
                d.label.as_str(),
                d.first_pct,
                d.second_pct,
                d.drift,
                if d.stable { "stable" } else { "drifting" }
            );
        }
        println!("{sep}");
    }
}

pub fn print_json(report: &ClusterReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clusters::analyze;
    use crate::model::CommitSummary;

    #[test]
    fn print_does_not_panic() {
        let commits: Vec<CommitSummary> = (0..6)
            .map(|i| CommitSummary {
                commit_id: format!("c{i}"),
                author: "alice".into(),
                timestamp: 1_700_000_000 + i,
                file_count: if i % 2 == 0 { 1 } else { 9 },
                total_added: 10 * (i as usize + 1),
                total_deleted: 5,
                add_ratio: 0.6,
            })
            .collect();
        let report = analyze(&commits, 42);
        print_report(&report);
        print_json(&report).unwrap();
        print_report(&ClusterReport::default());
    }
}
