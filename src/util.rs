//! Shared utilities: analysis-window parsing.

use crate::error::{Result, XrayError};

/// Seconds per day, used wherever a window is converted to timestamps.
pub const DAY_SECONDS: i64 = 86_400;

/// Parse a window spec like "90d", "6m", "1y" into a number of days.
///
/// Approximations: 1 month = 30 days, 1 year = 365 days.
pub fn parse_window(s: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() {
        return Err(XrayError::Input("empty --window value".to_string()));
    }

    let split_pos = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, unit) = s.split_at(split_pos);
    let n: u32 = num_str.parse().map_err(|_| {
        XrayError::Input(format!(
            "invalid --window value: {s:?} (expected e.g. 90d, 6m, 1y)"
        ))
    })?;
    if n == 0 {
        return Err(XrayError::Input(format!(
            "invalid --window value: {s:?} (window must be at least one day)"
        )));
    }

    let days = match unit {
        "" | "d" | "day" | "days" => Some(n),
        "m" | "mo" | "month" | "months" => n.checked_mul(30),
        "y" | "yr" | "year" | "years" => n.checked_mul(365),
        _ => {
            return Err(XrayError::Input(format!(
                "unknown unit in --window: {s:?} (use d, m, or y)"
            )));
        }
    };

    days.ok_or_else(|| XrayError::Input(format!("--window value too large: {s:?}")))
}
