use crate::report_helpers::{max_width, print_json_stdout, separator};

use super::ComplexityReport;

pub fn print_report(report: &ComplexityReport, top: usize) {
    if report.functions.is_empty() {
        println!("No functions found in the analyzed tree.");
        return;
    }

    let shown = &report.functions[..report.functions.len().min(top)];
    let name_width = max_width(shown.iter().map(|f| f.name.as_str()), 8);
    let file_width = max_width(shown.iter().map(|f| f.file.as_str()), 4);
    let sep = separator((name_width + file_width + 40).max(78));

    println!("Function complexity");
    println!("{sep}");
    println!(
        " {:<fw$}  {:<nw$} {:>5} {:>6} {:>6} {:>5} {:>6}",
        "File",
        "Function",
        "Line",
        "Cyclo",
        "Cogn.",
        "Nest",
        "Length",
        fw = file_width,
        nw = name_width
    );
    println!("{sep}");
    for f in shown {
        println!(
            " {:<fw$}  {:<nw$} {:>5} {:>6} {:>6} {:>5} {:>6}",
            f.file,
            f.name,
            f.line,
            f.cyclomatic,
            f.cognitive,
            f.max_nesting,
            f.length,
            fw = file_width,
            nw = name_width
        );
    }
    println!("{sep}");
    println!();
    println!(
        "{} function(s) across {} file(s); mean cyclomatic {:.2}, max cognitive {}.",
        report.functions.len(),
        report.file_count,
        report.mean_cyclomatic,
        report.max_cognitive
    );
}

pub fn print_json(report: &ComplexityReport) -> crate::error::Result<()> {
    print_json_stdout(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::analyze;
    use crate::lang::parse_module;

    #[test]
    fn print_does_not_panic() {
        let module = parse_module("m.py", b"def f(x):\n    if x:\n        return 1\n").unwrap();
        let report = analyze(&[module]);
        print_report(&report, 20);
        print_json(&report).unwrap();
        print_report(&ComplexityReport::default(), 20);
    }
}
