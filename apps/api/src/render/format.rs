//! Text formatting helpers shared by every template.

use chrono::NaiveDate;

/// Formats a `YYYY-MM` value as `Mon YYYY` (`2021-01` → `Jan 2021`).
///
/// Empty or malformed input yields an empty string.
pub fn format_month(value: &str) -> String {
    let value = value.trim();
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !well_formed {
        return String::new();
    }

    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Formats an experience date range.
///
/// A current role always ends in `Present`, whatever `end` holds. When only
/// one side is known it is shown alone.
pub fn format_date_range(start: &str, end: &str, is_current: bool) -> String {
    let start = format_month(start);
    let end = if is_current {
        "Present".to_string()
    } else {
        format_month(end)
    };

    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Splits multi-line text into trimmed lines, dropping blank ones.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flattens a list of (possibly multi-line) items into bullet lines.
pub fn bullet_lines(items: &[String]) -> Vec<String> {
    items.iter().flat_map(|item| split_lines(item)).collect()
}

/// Joins the non-blank parts with `separator`.
pub fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
