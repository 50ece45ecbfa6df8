//! Greedy word wrapping against Helvetica metrics

use super::font::{text_width_mm, FontVariant};

/// Slack for float rounding when a line fits exactly
const FIT_TOLERANCE_MM: f32 = 1e-4;

/// Reflow `text` into lines no wider than `max_width_mm`
///
/// Words are separated by single spaces; runs of spaces are kept as empty
/// words so leading indentation survives. A word wider than the limit is
/// broken between characters. Always returns at least one line.
pub fn wrap_text(text: &str, variant: FontVariant, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let limit = max_width_mm + FIT_TOLERANCE_MM;
    let space_width = text_width_mm(" ", variant, size_pt);

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0_f32;
    let mut started = false;

    for word in text.split(' ') {
        let word_width = text_width_mm(word, variant, size_pt);

        if started {
            if width + space_width + word_width <= limit {
                line.push(' ');
                line.push_str(word);
                width += space_width + word_width;
                continue;
            }
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }
        started = true;

        if word_width <= limit {
            line.push_str(word);
            width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = text_width_mm(ch.encode_utf8(&mut [0; 4]), variant, size_pt);
            if width + ch_width > limit && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            line.push(ch);
            width += ch_width;
        }
    }

    lines.push(line);
    lines
}
