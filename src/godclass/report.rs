use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::GodClassReport;

pub fn print_report(report: &GodClassReport, top: usize) {
    if report.classes.is_empty() {
        println!("No classes found in the analyzed tree.");
        return;
    }

    let shown = &report.classes[..report.classes.len().min(top)];
    let name_width = max_width(shown.iter().map(|c| c.name.as_str()), 5);
    let file_width = max_width(shown.iter().map(|c| c.file.as_str()), 4);
    let sep = separator((name_width + file_width + 44).max(78));

    println!("God classes (GCS > 0.6 flagged)");
    println!("{sep}");
    println!(
        " {:<fw$}  {:<nw$} {:>7} {:>6} {:>5} {:>6} {:>6} {:>5}",
        "File",
        "Class",
        "Methods",
        "Fields",
        "WMC",
        "TCC",
        "GCS",
        "Flag",
        fw = file_width,
        nw = name_width
    );
    println!("{sep}");
    for c in shown {
        println!(
            " {:<fw$}  {:<nw$} {:>7} {:>6} {:>5} {:>6.3} {:>6.3} {:>5}",
            c.file,
            c.name,
            c.method_count,
            c.field_count,
            c.wmc,
            c.tcc,
            c.gcs,
            if c.flagged { "YES" } else { "-" },
            fw = file_width,
            nw = name_width
        );
    }
    println!("{sep}");
    println!();
    println!("{} class(es) flagged.", report.flagged_count);
}

pub fn print_json(report: &GodClassReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}
