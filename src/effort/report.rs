use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::EffortReport;

pub fn print_report(report: &EffortReport, top: usize) {
    if report.files.is_empty() {
        println!("No files to model (empty window).");
        return;
    }

    let shown = &report.files[..report.files.len().min(top)];
    let path_width = max_width(shown.iter().map(|f| f.path.as_str()), 4);
    let sep = separator((path_width + 30).max(78));

    if report.fallback {
        println!("Relative effort (uniform fallback model: fewer than 3 files)");
    } else {
        println!(
            "Relative effort (ridge, \u{03b1} = {}, R\u{00b2} = {:.3})",
            report.alpha, report.r_squared
        );
    }
    println!("{sep}");
    println!(" {:<width$}  {:>7}  Top contributor", "File", "REI", width = path_width);
    println!("{sep}");
    for f in shown {
        let top_feature = f
            .contributions
            .iter()
            .max_by(|a, b| {
                a.1.abs()
                    .partial_cmp(&b.1.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(name, _)| name.as_str())
            .unwrap_or("-");
        println!(
            " {:<width$}  {:>7.3}  {}",
            f.path,
            f.rei,
            top_feature,
            width = path_width
        );
    }
    println!("{sep}");
    println!();
    println!("Coefficients:");
    for (name, coef) in &report.coefficients {
        println!("  {name:<16} {coef:>9.4}");
    }
}

pub fn print_json(report: &EffortReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}
