use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::DXReport;

pub fn print_report(report: &DXReport, top: usize) {
    let sep = separator(78);
    println!("Developer experience");
    println!("{sep}");
    println!(" Throughput      {:>6.3}", report.throughput);
    println!(" Feedback        {:>6.3}", report.feedback);
    println!(" Focus           {:>6.3}", report.focus);
    println!(" Cognitive load  {:>6.3}", report.cognitive_load);
    println!("{sep}");
    println!(" DX score        {:>6.3}", report.dx_score);
    println!("{sep}");

    if !report.files.is_empty() {
        let mut files = report.files.clone();
        files.sort_by(|a, b| {
            b.cognitive_load
                .partial_cmp(&a.cognitive_load)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let shown = &files[..files.len().min(top)];
        let path_width = max_width(shown.iter().map(|f| f.path.as_str()), 4);

        println!();
        println!("Heaviest files (cognitive load)");
        let sep = separator((path_width + 14).max(78));
        println!("{sep}");
        for f in shown {
            println!(
                " {:<width$}  {:>6.3}",
                f.path,
                f.cognitive_load,
                width = path_width
            );
        }
        println!("{sep}");
    }
}

pub fn print_json(report: &DXReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_does_not_panic() {
        print_report(&DXReport::default(), 20);
        print_json(&DXReport::default()).unwrap();
    }
}
