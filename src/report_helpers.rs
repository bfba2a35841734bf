//! Shared report formatting utilities (separators, path widths, JSON).

use serde::Serialize;

/// Compute the max display width for a column of strings, with a minimum.
pub fn max_width<'a>(items: impl Iterator<Item = &'a str>, min: usize) -> usize {
    items.map(|s| s.len()).max().unwrap_or(min).max(min)
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> crate::error::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| crate::error::XrayError::Analysis(format!("JSON encoding failed: {e}")))?;
    println!("{text}");
    Ok(())
}
