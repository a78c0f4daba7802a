//! Line Composer — fits label text into a horizontal budget.
//!
//! A criteria line reserves space on the right for the score token plus a
//! fixed gap; the label gets whatever is left. A label that measures wider
//! than its budget is shortened to the longest prefix that, together with the
//! `...` marker, still fits. The composed width never exceeds the budget.
//!
//! Word wrapping for comment blocks lives here too: greedy wrap by measured
//! width, with oversized words force-broken at character granularity.

use crate::layout::font_metrics::{get_metrics, FontFace};

/// Appended to a shortened label. ASCII so it is exactly measurable.
pub const ELLIPSIS: &str = "...";

/// Rendered score token for an absent or blank score.
pub const MISSING_SCORE: &str = "?";

/// Result of fitting one label into its budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLabel {
    pub text: String,
    pub truncated: bool,
}

/// Fits `label` into `budget_pt`, truncating with [`ELLIPSIS`] when needed.
///
/// The break point is found by a linear scan over per-character widths; a
/// budget too small for even the ellipsis yields an empty composed text.
/// Trailing whitespace is trimmed before the marker is appended.
pub fn compose_label(label: &str, budget_pt: f32, face: FontFace, size_pt: f32) -> ComposedLabel {
    let metrics = get_metrics(face);

    if metrics.measure_str(label, size_pt) <= budget_pt {
        return ComposedLabel {
            text: label.to_string(),
            truncated: false,
        };
    }

    let ellipsis_width = metrics.measure_str(ELLIPSIS, size_pt);
    let available = budget_pt - ellipsis_width;
    if available <= 0.0 {
        return ComposedLabel {
            text: String::new(),
            truncated: true,
        };
    }

    let mut prefix = String::new();
    let mut width = 0.0_f32;
    for c in label.chars() {
        let char_w = metrics.char_width(c) * size_pt;
        if width + char_w > available {
            break;
        }
        width += char_w;
        prefix.push(c);
    }

    let mut text = prefix.trim_end().to_string();
    text.push_str(ELLIPSIS);
    ComposedLabel {
        text,
        truncated: true,
    }
}

/// Formats a score value as its bracketed token, e.g. `[ 3 ]`.
///
/// Absent and blank scores both render as `[ ? ]` — the original form sends
/// empty strings for unanswered criteria.
pub fn score_token(score: Option<&str>) -> String {
    let value = match score {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => MISSING_SCORE,
    };
    format!("[ {value} ]")
}

/// Greedy word-wrap of `text` into lines no wider than `max_width_pt`.
///
/// Splits on existing newlines first, then wraps each paragraph by measured
/// width. Words wider than a full line are force-broken so a single long
/// token can never overflow the margin. An empty paragraph yields one empty
/// line (paragraph breaks survive).
pub fn wrap_text(text: &str, max_width_pt: f32, face: FontFace, size_pt: f32) -> Vec<String> {
    let metrics = get_metrics(face);
    let space_w = metrics.space_width * size_pt;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in words {
            let word_w = metrics.measure_str(word, size_pt);

            if word_w > max_width_pt {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                // Force-break the oversized word by character.
                let mut chunk = String::new();
                let mut chunk_w = 0.0_f32;
                for c in word.chars() {
                    let char_w = metrics.char_width(c) * size_pt;
                    if chunk_w + char_w > max_width_pt && !chunk.is_empty() {
                        lines.push(std::mem::take(&mut chunk));
                        chunk_w = 0.0;
                    }
                    chunk.push(c);
                    chunk_w += char_w;
                }
                current = chunk;
                current_width = chunk_w;
            } else if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w <= max_width_pt {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
