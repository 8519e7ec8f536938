use crate::text_metrics::{TextMetricsProvider, text_width};

use super::FontSpec;

/// Split on explicit breaks: newlines, literal `\n`, `<br>` and `<br/>`.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = text.replace("<br/>", "\n").replace("<br>", "\n");
    current = current.replace("\\n", "\n");
    for line in current.split('\n') {
        lines.push(line.trim().to_string());
    }
    lines
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Tokens that are wider than the budget on their own are broken between
/// characters. A single character wider than the budget still gets a line
/// to itself, so the result can exceed `max_width` only in that case.
pub fn wrap<P: TextMetricsProvider + ?Sized>(
    text: &str,
    font: &FontSpec,
    max_width: f32,
    metrics: &P,
) -> Vec<String> {
    split_lines(text)
        .iter()
        .flat_map(|line| wrap_line(line, font, max_width, metrics))
        .collect()
}

pub fn wrap_line<P: TextMetricsProvider + ?Sized>(
    line: &str,
    font: &FontSpec,
    max_width: f32,
    metrics: &P,
) -> Vec<String> {
    if text_width(metrics, line, font) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(metrics, &candidate, font) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(metrics, word, font) > max_width {
            let mut pieces = break_token(word, font, max_width, metrics);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        } else {
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_token<P: TextMetricsProvider + ?Sized>(
    token: &str,
    font: &FontSpec,
    max_width: f32,
    metrics: &P,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in token.chars() {
        current.push(ch);
        if current.chars().count() > 1 && text_width(metrics, &current, font) > max_width {
            current.pop();
            pieces.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Vertical offset of each line from the block center, top to bottom.
pub fn line_offsets(count: usize, line_height: f32) -> Vec<f32> {
    let first = -((count.saturating_sub(1)) as f32 / 2.0) * line_height;
    (0..count).map(|i| first + i as f32 * line_height).collect()
}

pub fn block_height(count: usize, line_height: f32) -> f32 {
    count as f32 * line_height
}
