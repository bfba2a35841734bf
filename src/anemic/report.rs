use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::AnemicReport;

pub fn print_report(report: &AnemicReport, top: usize) {
    if report.classes.is_empty() {
        println!("No classes found in the analyzed tree.");
        return;
    }

    let shown = &report.classes[..report.classes.len().min(top)];
    let name_width = max_width(shown.iter().map(|c| c.name.as_str()), 5);
    let file_width = max_width(shown.iter().map(|c| c.file.as_str()), 4);
    let sep = separator((name_width + file_width + 46).max(78));

    println!("Anemic classes (AMS > 0.5 flagged)");
    println!("{sep}");
    println!(
        " {:<fw$}  {:<nw$} {:>6} {:>8} {:>6} {:>6} {:>6} {:>5}",
        "File",
        "Class",
        "Fields",
        "Behavior",
        "DBSI",
        "AMS",
        "Touch",
        "Flag",
        fw = file_width,
        nw = name_width
    );
    println!("{sep}");
    for c in shown {
        println!(
            " {:<fw$}  {:<nw$} {:>6} {:>8} {:>6.3} {:>6.3} {:>6} {:>5}",
            c.file,
            c.name,
            c.fields,
            c.behavior_methods,
            c.dbsi,
            c.ams,
            c.touch_count,
            if c.flagged { "YES" } else { "-" },
            fw = file_width,
            nw = name_width
        );
    }
    println!("{sep}");
    println!();
    println!("{} class(es) flagged.", report.flagged_count);
}

pub fn print_json(report: &AnemicReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}
