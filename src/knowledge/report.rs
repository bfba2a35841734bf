use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::KnowledgeReport;

pub fn print_report(report: &KnowledgeReport, top: usize) {
    if report.files.is_empty() {
        println!("No knowledge data found (empty window).");
        return;
    }

    let shown = &report.files[..report.files.len().min(top)];
    let path_width = max_width(shown.iter().map(|f| f.path.as_str()), 4);
    let sep = separator((path_width + 50).max(78));

    println!("Knowledge distribution");
    println!("{sep}");
    println!(
        " {:<width$}  {:<20} {:>7} {:>7} {:>7}",
        "File",
        "Primary author",
        "Share",
        "KDI",
        "Island",
        width = path_width
    );
    println!("{sep}");
    for f in shown {
        println!(
            " {:<width$}  {:<20} {:>6.0}% {:>7.3} {:>7}",
            f.path,
            f.primary_author,
            f.primary_pct * 100.0,
            f.kdi,
            if f.is_island { "YES" } else { "-" },
            width = path_width
        );
    }
    println!("{sep}");
    println!();
    println!(
        "DRI (Gini of author churn): {:.3}   bus factor (50% churn): {} of {} author(s)",
        report.dri, report.bus_factor_50, report.author_count
    );
}

pub fn print_json(report: &KnowledgeReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::analyze;
    use crate::model::FileChange;

    #[test]
    fn print_does_not_panic() {
        let changes = vec![FileChange {
            commit_id: "c1".into(),
            author: "alice".into(),
            timestamp: 1_700_000_000,
            path: "x.py".into(),
            added: 10,
            deleted: 0,
        }];
        let report = analyze(&changes, 1_700_000_000);
        print_report(&report, 20);
        print_json(&report).unwrap();
        print_report(&KnowledgeReport::default(), 20);
    }
}
