use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::HotspotReport;

pub fn print_report(report: &HotspotReport, top: usize) {
    if report.files.is_empty() {
        println!("No hotspots found (empty window or zero churn).");
        return;
    }

    let shown = &report.files[..report.files.len().min(top)];
    let path_width = max_width(shown.iter().map(|f| f.path.as_str()), 4);
    let sep = separator((path_width + 42).max(78));

    println!("Hotspots (weighted churn \u{00d7} weighted frequency)");
    println!("{sep}");
    println!(
        " {:<width$}  {:>7} {:>8} {:>8} {:>8}",
        "File",
        "Commits",
        "Churn",
        "Score",
        "Rework",
        width = path_width
    );
    println!("{sep}");
    for f in shown {
        println!(
            " {:<width$}  {:>7} {:>8} {:>8.3} {:>7.0}%",
            f.path,
            f.frequency,
            f.churn,
            f.hotspot_score,
            f.rework_ratio * 100.0,
            width = path_width
        );
    }
    println!("{sep}");
    println!();
    println!(
        "Churn concentration: {} file(s) carry 50% of churn, {} carry 80%, {} carry 90%.",
        report.pareto.files_for_50_pct,
        report.pareto.files_for_80_pct,
        report.pareto.files_for_90_pct
    );
}

pub fn print_json(report: &HotspotReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspots::analyze;
    use crate::model::FileChange;

    fn sample_report() -> HotspotReport {
        let changes = vec![
            FileChange {
                commit_id: "c1".into(),
                author: "a@t.com".into(),
                timestamp: 1_700_000_000,
                path: "src/foo.py".into(),
                added: 40,
                deleted: 2,
            },
            FileChange {
                commit_id: "c2".into(),
                author: "a@t.com".into(),
                timestamp: 1_700_000_500,
                path: "src/foo.py".into(),
                added: 4,
                deleted: 4,
            },
        ];
        analyze(&changes, 1_700_000_500)
    }

    #[test]
    fn print_report_does_not_panic() {
        print_report(&sample_report(), 20);
        print_report(&HotspotReport::default(), 20);
    }

    #[test]
    fn print_json_is_valid() {
        print_json(&sample_report()).unwrap();
        let text = serde_json::to_string(&sample_report()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["files"][0]["path"], "src/foo.py");
        assert_eq!(parsed["total_churn"], 50);
    }
}
