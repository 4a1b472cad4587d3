//! Greedy word wrap against a pixel budget.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_px` at `font_px`.
///
/// Whitespace runs collapse to single spaces. A word wider than the budget sits
/// alone on its own (overflowing) line rather than being split. Blank input
/// yields no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    font_px: f32,
    max_width_px: f32,
) -> Vec<String> {
    let space_w = metrics.space_width() * font_px;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_px(word, font_px);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_px {
            // Line full; this word starts the next one.
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFamily};

    #[test]
    fn test_blank_text_has_no_lines() {
        let metrics = get_metrics(FontFamily::Inter);
        assert!(wrap_text("", &metrics, 14.0, 500.0).is_empty());
        assert!(wrap_text("   \t ", &metrics, 14.0, 500.0).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        let metrics = get_metrics(FontFamily::Inter);
        assert_eq!(
            wrap_text("Engineer  at   Acme", &metrics, 14.0, 500.0),
            vec!["Engineer at Acme"]
        );
    }

    #[test]
    fn test_long_text_wraps_within_budget() {
        let metrics = get_metrics(FontFamily::Inter);
        let text = "word ".repeat(60);
        let lines = wrap_text(&text, &metrics, 14.0, 300.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_px(line, 14.0) <= 300.0 + 1e-3);
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn test_oversized_word_gets_own_line() {
        let metrics = get_metrics(FontFamily::Inter);
        let long_word = "x".repeat(200);
        let text = format!("a {long_word} b");
        let lines = wrap_text(&text, &metrics, 14.0, 100.0);
        assert_eq!(lines, vec!["a".to_string(), long_word, "b".to_string()]);
    }
}
