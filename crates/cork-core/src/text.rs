//! Card label layout: greedy word wrap plus iterative font shrink.
//!
//! The same routine drives both the static label renderer and the live
//! auto-grow rule applied while typing, so a card never grows to fit a
//! layout that the painter would then draw differently.

use crate::consts::*;
use crate::geometry::clamp;
use serde::Serialize;

/// Width measurement for a run of card label text.
///
/// Implementations measure `text` set in the card label face
/// (`600 {font_size}px "Inter", sans-serif`) and return its advance width
/// in world units.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

/// Deterministic metric: every character advances `em_ratio × font_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub em_ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em_ratio: 0.55 }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.em_ratio
    }
}

/// CSS font shorthand for the card label face at `font_size` px.
pub fn font_css(font_size: f64) -> String {
    format!("600 {font_size}px \"Inter\", sans-serif")
}

/// A fitted label layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayout {
    pub font_size: f64,
    pub line_height: f64,
    pub lines: Vec<String>,
    pub total_height: f64,
    pub fits_within: bool,
}

/// Text that is actually measured: blank input becomes the placeholder.
fn content(text: &str) -> &str {
    if text.trim().is_empty() {
        PLACEHOLDER_TEXT
    } else {
        text
    }
}

/// Greedy word wrap. Paragraphs split on `\n` (with optional `\r`); an
/// empty paragraph yields an empty line. A single word wider than
/// `max_width` is kept on its own line rather than broken.
pub fn wrap_lines(measure: &dyn TextMeasure, text: &str, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content(text).split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{current} {word}");
            if measure.measure(&candidate, font_size) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Fit `text` into a `width × height` card.
///
/// Starts from an estimate based on how many lines the text wraps to at
/// the maximum size, then re-wraps and shrinks until the block fits inside
/// the inset box or the minimum size is reached.
pub fn layout_card_text(measure: &dyn TextMeasure, text: &str, width: f64, height: f64) -> TextLayout {
    let max_width = (width - CARD_TEXT_INSET * 2.0).max(1.0);
    let max_height = (height - CARD_TEXT_INSET * 2.0).max(1.0);

    let initial = wrap_lines(measure, text, CARD_TEXT_MAX_FONT_SIZE, max_width).len();
    let target = CARD_TEXT_MAX_FONT_SIZE - initial.saturating_sub(1) as f64 * CARD_TEXT_SHRINK_PER_LINE;
    let mut font_size = clamp(target, CARD_TEXT_MIN_FONT_SIZE, CARD_TEXT_MAX_FONT_SIZE);

    let mut attempt = 1;
    loop {
        let mut lines = wrap_lines(measure, text, font_size, max_width);
        let line_height = font_size * CARD_TEXT_LINE_HEIGHT_MULTIPLIER;
        let total_height = lines.len() as f64 * line_height;
        let fits_within = total_height <= max_height;

        // Stop on the size just laid out, never on an untried one.
        if fits_within || font_size <= CARD_TEXT_MIN_FONT_SIZE || attempt >= CARD_TEXT_FIT_ATTEMPTS {
            if lines.is_empty() {
                lines.push(PLACEHOLDER_TEXT.to_string());
            }
            return TextLayout {
                font_size,
                line_height,
                lines,
                total_height,
                fits_within,
            };
        }

        let overflow = total_height / max_height;
        let shrink = ((overflow - 1.0) * 2.0).ceil().max(1.0);
        font_size = (font_size - shrink).max(CARD_TEXT_MIN_FONT_SIZE);
        attempt += 1;
    }
}

/// Height a card should take after its text changes to `text`.
///
/// Grows (never shrinks) to hold the fitted block plus insets, clamped to
/// the legal card height range.
pub fn grown_height(measure: &dyn TextMeasure, text: &str, width: f64, height: f64) -> f64 {
    let layout = layout_card_text(measure, text, width, height);
    if layout.fits_within {
        return height;
    }
    let wanted = clamp(
        layout.total_height + CARD_TEXT_INSET * 2.0,
        MIN_CARD_HEIGHT,
        MAX_CARD_HEIGHT,
    );
    height.max(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metric() -> FixedAdvance {
        FixedAdvance::default()
    }

    #[test]
    fn blank_text_lays_out_placeholder() {
        let layout = layout_card_text(&metric(), "   \n ", 300.0, 300.0);
        assert_eq!(layout.lines, vec!["Card".to_string()]);
        assert_eq!(layout.font_size, CARD_TEXT_MAX_FONT_SIZE);
        assert!(layout.fits_within);
    }

    #[test]
    fn wrap_splits_paragraphs_and_keeps_empty_lines() {
        let lines = wrap_lines(&metric(), "one\r\n\ntwo", 20.0, 1000.0);
        assert_eq!(lines, vec!["one".to_string(), String::new(), "two".to_string()]);
    }

    #[test]
    fn wrap_is_greedy() {
        // 10 px per char.
        let m = FixedAdvance { em_ratio: 0.5 };
        let lines = wrap_lines(&m, "aaa bbb ccc ddd", 20.0, 75.0);
        assert_eq!(lines, vec!["aaa bbb".to_string(), "ccc ddd".to_string()]);
    }

    #[test]
    fn long_word_stays_whole() {
        let m = FixedAdvance { em_ratio: 0.5 };
        let lines = wrap_lines(&m, "tiny extraordinarily", 20.0, 60.0);
        assert_eq!(lines, vec!["tiny".to_string(), "extraordinarily".to_string()]);
    }

    #[test]
    fn short_text_keeps_max_font() {
        let layout = layout_card_text(&metric(), "Hello", 300.0, 300.0);
        assert_eq!(layout.font_size, CARD_TEXT_MAX_FONT_SIZE);
        assert_eq!(layout.line_height, CARD_TEXT_MAX_FONT_SIZE * CARD_TEXT_LINE_HEIGHT_MULTIPLIER);
        assert_eq!(layout.lines.len(), 1);
    }

    #[test]
    fn font_never_leaves_range() {
        let text = "word ".repeat(400);
        let layout = layout_card_text(&metric(), &text, 120.0, 80.0);
        assert_eq!(layout.font_size, CARD_TEXT_MIN_FONT_SIZE);
        assert!(!layout.fits_within);
    }

    #[test]
    fn grown_height_never_shrinks() {
        assert_eq!(grown_height(&metric(), "hi", 300.0, 500.0), 500.0);
        let text = "word ".repeat(400);
        assert_eq!(grown_height(&metric(), &text, 120.0, 80.0), MAX_CARD_HEIGHT);
    }

    #[test]
    fn font_css_shorthand() {
        assert_eq!(font_css(14.0), "600 14px \"Inter\", sans-serif");
    }
}
