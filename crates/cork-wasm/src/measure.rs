//! Label metrics from the browser's own text shaper.

use cork_core::text::{FixedAdvance, TextMeasure, font_css};
use web_sys::CanvasRenderingContext2d;

/// Measures label runs with `CanvasRenderingContext2d::measure_text`, so
/// wrapping matches what the Canvas2D painter draws.
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
    fallback: FixedAdvance,
}

impl CanvasMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            fallback: FixedAdvance::default(),
        }
    }
}

impl TextMeasure for CanvasMeasure {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        self.ctx.set_font(&font_css(font_size));
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => self.fallback.measure(text, font_size),
        }
    }
}
