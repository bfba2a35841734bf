use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::pain::PainReport;
use super::CouplingReport;

pub fn print_report(coupling: &CouplingReport, pain: &PainReport, top: usize) {
    if coupling.pairs.is_empty() {
        println!("No temporal coupling found (no pair shares 2+ commits).");
    } else {
        let shown = &coupling.pairs[..coupling.pairs.len().min(top)];
        let a_width = max_width(shown.iter().map(|p| p.file_a.as_str()), 6);
        let b_width = max_width(shown.iter().map(|p| p.file_b.as_str()), 6);
        let sep = separator((a_width + b_width + 34).max(78));

        println!("Temporal coupling ({} commits)", coupling.total_commits);
        println!("{sep}");
        println!(
            " {:<aw$}  {:<bw$}  {:>6} {:>6} {:>8} {:>8}",
            "File A",
            "File B",
            "Shared",
            "Union",
            "Jaccard",
            "Support",
            aw = a_width,
            bw = b_width
        );
        println!("{sep}");
        for p in shown {
            println!(
                " {:<aw$}  {:<bw$}  {:>6} {:>6} {:>8.3} {:>8.3}",
                p.file_a,
                p.file_b,
                p.shared_commits,
                p.union_commits,
                p.jaccard,
                p.support,
                aw = a_width,
                bw = b_width
            );
        }
        println!("{sep}");
    }

    if !pain.files.is_empty() {
        println!();
        let shown = &pain.files[..pain.files.len().min(top)];
        let path_width = max_width(shown.iter().map(|f| f.path.as_str()), 4);
        let sep = separator((path_width + 40).max(78));

        println!("PAIN (Size \u{00d7} Distance \u{00d7} Volatility)");
        println!("{sep}");
        println!(
            " {:<width$}  {:>7} {:>9} {:>9} {:>7}",
            "File",
            "Size",
            "Distance",
            "Volat.",
            "PAIN",
            width = path_width
        );
        println!("{sep}");
        for f in shown {
            println!(
                " {:<width$}  {:>7.3} {:>9.3} {:>9.3} {:>7.3}",
                f.path, f.size_norm, f.distance_norm, f.volatility_norm, f.pain,
                width = path_width
            );
        }
        println!("{sep}");
    }
}

pub fn print_json(coupling: &CouplingReport, pain: &PainReport) -> crate::error::Result<()> {
    print_json_stdout(&serde_json::json!({
        "coupling": coupling,
        "pain": pain,
    }))
}
