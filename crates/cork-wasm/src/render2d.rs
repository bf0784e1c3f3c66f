//! Canvas2D software renderer.
//!
//! Draws the board to an HTML `<canvas>` via `CanvasRenderingContext2d`.
//! Placement decisions (grid, card chrome, label lines, connector routing)
//! come from `cork_render::frame`.

use cork_core::Board;
use cork_core::consts::*;
use cork_core::model::{Card, Connector};
use cork_core::text::{TextMeasure, font_css, layout_card_text};
use cork_core::{Point, Vec2};
use cork_render::fade::HandleFade;
use cork_render::frame::*;
use cork_render::hit::handle_center;
use std::f64::consts::TAU;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Everything besides the board that one frame depends on.
pub struct FrameInput<'a> {
    pub theme: &'a Theme,
    pub fade: &'a HandleFade,
    pub measure: &'a dyn TextMeasure,
    /// Canvas size in CSS pixels.
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
    pub draft: Option<&'a DraftConnector>,
}

/// Render the whole board: background, grid, connectors, cards, handles.
pub fn render_board(ctx: &CanvasRenderingContext2d, board: &Board, input: &FrameInput) {
    let vp = board.viewport();
    let dpr = input.dpr;

    // Screen pass (CSS pixels)
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    ctx.set_fill_style_str(&input.theme.background.to_css());
    ctx.fill_rect(0.0, 0.0, input.width, input.height);
    draw_grid(ctx, board, input);

    // World pass
    let zoom = vp.scale * dpr;
    let _ = ctx.set_transform(zoom, 0.0, 0.0, zoom, vp.pan.x * dpr, vp.pan.y * dpr);
    let px = 1.0 / vp.scale;

    for conn in board.connectors() {
        draw_connector(ctx, board, conn, px, input.theme);
    }
    if let Some(draft) = input.draft {
        draw_draft(ctx, draft, px, input.theme);
    }

    let editing = board.selection().editing;
    for card in board.cards() {
        draw_card(ctx, board, card, px, zoom, input.theme);
        // The inline editor covers the card being edited.
        if editing != Some(card.id) {
            draw_label(ctx, card, input.measure);
        }
    }

    for card in board.cards() {
        let alpha = input.fade.alpha(card.id);
        if handle_visible(alpha) {
            draw_resize_handle(ctx, card, alpha, px, input.theme);
        }
    }

    for id in &board.selection().connectors {
        if let Some(conn) = board.connector(*id) {
            draw_connector_handles(ctx, board, conn, px, input.theme);
        }
    }

    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
}

fn draw_grid(ctx: &CanvasRenderingContext2d, board: &Board, input: &FrameInput) {
    let Some(grid) = GridLayout::compute(board.viewport(), input.width, input.height) else {
        return;
    };
    ctx.set_fill_style_str(&input.theme.grid_dot.to_css());
    ctx.begin_path();
    for dot in grid.dots() {
        ctx.move_to(dot.x + grid.dot_radius, dot.y);
        let _ = ctx.arc(dot.x, dot.y, grid.dot_radius, 0.0, TAU);
    }
    ctx.fill();
}

// ─── Cards ───────────────────────────────────────────────────────────────

fn draw_card(ctx: &CanvasRenderingContext2d, board: &Board, card: &Card, px: f64, zoom: f64, theme: &Theme) {
    let chrome = card_chrome(theme, board.selection(), card.id);

    ctx.save();
    if chrome.shadow {
        // Shadow parameters are in device pixels, outside the transform.
        ctx.set_shadow_color(&theme.card_shadow.to_css());
        ctx.set_shadow_blur(SHADOW_BLUR * zoom);
        ctx.set_shadow_offset_y(SHADOW_OFFSET_Y * zoom);
    }
    rounded_rect_path(ctx, card.x, card.y, card.width, card.height, CARD_CORNER_RADIUS);
    ctx.set_fill_style_str(&card.color.to_css());
    ctx.fill();
    clear_shadow(ctx);

    ctx.set_stroke_style_str(&chrome.stroke.to_css());
    ctx.set_line_width(chrome.stroke_width * px);
    ctx.stroke();
    ctx.restore();
}

fn draw_label(ctx: &CanvasRenderingContext2d, card: &Card, measure: &dyn TextMeasure) {
    let layout = layout_card_text(measure, &card.text, card.width, card.height);

    ctx.save();
    ctx.set_font(&font_css(layout.font_size));
    ctx.set_fill_style_str(&card.label_color().to_css());
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for line in place_label(card, &layout) {
        let _ = ctx.fill_text(line.text, line.center.x, line.center.y);
    }
    ctx.restore();
}

fn draw_resize_handle(ctx: &CanvasRenderingContext2d, card: &Card, alpha: f64, px: f64, theme: &Theme) {
    let center = handle_center(card);
    ctx.save();
    ctx.set_global_alpha(alpha);
    circle_path(ctx, center, HANDLE_RADIUS * px);
    ctx.set_fill_style_str(&theme.handle_fill.to_css());
    ctx.fill();
    ctx.set_stroke_style_str(&theme.handle_stroke.to_css());
    ctx.set_line_width(2.0 * px);
    ctx.stroke();
    ctx.restore();
}

// ─── Connectors ──────────────────────────────────────────────────────────

fn draw_connector(ctx: &CanvasRenderingContext2d, board: &Board, conn: &Connector, px: f64, theme: &Theme) {
    let segments = board.connector_segments(conn);
    let Some(first) = segments.first() else {
        return;
    };
    let (color, width) = connector_stroke(theme, board.selection(), conn.id);

    ctx.save();
    ctx.set_stroke_style_str(&color.to_css());
    ctx.set_line_width(width * px);
    ctx.set_line_cap("round");
    ctx.begin_path();
    ctx.move_to(first.p0.x, first.p0.y);
    for seg in &segments {
        ctx.bezier_curve_to(seg.p1.x, seg.p1.y, seg.p2.x, seg.p2.y, seg.p3.x, seg.p3.y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_draft(ctx: &CanvasRenderingContext2d, draft: &DraftConnector, px: f64, theme: &Theme) {
    let segments = draft.segments();
    let Some(first) = segments.first() else {
        return;
    };

    ctx.save();
    ctx.set_stroke_style_str(&theme.draft.to_css());
    ctx.set_line_width(2.0 * px);
    let [on, off] = DRAFT_DASH;
    let dash = js_sys::Array::of2(&JsValue::from_f64(on * px), &JsValue::from_f64(off * px));
    let _ = ctx.set_line_dash(&dash);
    ctx.begin_path();
    ctx.move_to(first.p0.x, first.p0.y);
    for seg in &segments {
        ctx.bezier_curve_to(seg.p1.x, seg.p1.y, seg.p2.x, seg.p2.y, seg.p3.x, seg.p3.y);
    }
    ctx.stroke();
    let _ = ctx.set_line_dash(&js_sys::Array::new());
    ctx.restore();
}

/// Endpoint and bend handles of a selected connector.
fn draw_connector_handles(ctx: &CanvasRenderingContext2d, board: &Board, conn: &Connector, px: f64, theme: &Theme) {
    let Some(points) = board.connector_points(conn) else {
        return;
    };
    let last = points.len().saturating_sub(1);

    ctx.save();
    ctx.set_fill_style_str(&theme.connector_handle_fill.to_css());
    ctx.set_stroke_style_str(&theme.connector_selected.to_css());
    ctx.set_line_width(2.0 * px);
    for (i, point) in points.iter().enumerate() {
        // Bends read as smaller knobs than the two ends.
        let radius = if i == 0 || i == last {
            CONNECTOR_HANDLE_RADIUS
        } else {
            CONNECTOR_HANDLE_RADIUS * 0.75
        };
        circle_path(ctx, *point, radius * px);
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}

fn circle_path(ctx: &CanvasRenderingContext2d, center: Point, radius: f64) {
    ctx.begin_path();
    let start = center + Vec2::new(radius, 0.0);
    ctx.move_to(start.x, start.y);
    let _ = ctx.arc(center.x, center.y, radius, 0.0, TAU);
}

/// Clear shadow after fill so the stroke doesn't inherit it.
fn clear_shadow(ctx: &CanvasRenderingContext2d) {
    ctx.set_shadow_blur(0.0);
    ctx.set_shadow_offset_x(0.0);
    ctx.set_shadow_offset_y(0.0);
    ctx.set_shadow_color("transparent");
}
