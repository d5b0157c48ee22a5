use crate::text_metrics::{self, FALLBACK_CHAR_FACTOR};

use super::TextBlock;

pub(super) const LINE_HEIGHT: f32 = 1.25;

/// Measures `text` at the given size, wrapping lines wider than `max_width`
/// pixels. Explicit newlines are honored before wrapping.
pub(super) fn measure_block(
    text: &str,
    font_size: f32,
    font_family: &str,
    max_width: f32,
) -> TextBlock {
    let mut lines = Vec::new();
    for line in split_lines(text) {
        lines.extend(wrap_line(&line, max_width, font_size, font_family));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * LINE_HEIGHT;
    TextBlock {
        lines,
        width,
        height,
    }
}

/// Single-line measurement without wrapping.
pub(super) fn measure_line(text: &str, font_size: f32, font_family: &str) -> TextBlock {
    let line = text.trim().to_string();
    let width = text_width(&line, font_size, font_family);
    TextBlock {
        lines: vec![line],
        width,
        height: font_size * LINE_HEIGHT,
    }
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(super) fn wrap_line(
    line: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
) -> Vec<String> {
    if text_width(line, font_size, font_family) <= max_width {
        return vec![line.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, font_size, font_family) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(line.to_string());
    }
    lines
}

pub(super) fn text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_width(text, font_size))
}

fn fallback_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_CHAR_FACTOR
}
