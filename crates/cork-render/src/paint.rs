//! Board → Vello drawing commands.
//!
//! Emits one full frame: background, dot grid, connectors, cards, handles.
//! Card labels are not shaped here; their placement is only traced, and
//! the Canvas2D painter in `cork-wasm` draws the glyphs. Board geometry is painted under the pan/zoom transform; stroke widths
//! and handle radii are divided by the scale so they keep a constant
//! on-screen size.

use crate::fade::HandleFade;
use crate::frame::*;
use crate::hit::handle_center;
use cork_core::Board;
use cork_core::consts::*;
use cork_core::model::{Card, Color as CardColor, Connector};
use cork_core::route::route_path;
use cork_core::text::{TextMeasure, layout_card_text};
use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Everything besides the board that a frame depends on.
pub struct PaintContext<'a> {
    pub theme: &'a Theme,
    pub fade: &'a HandleFade,
    pub measure: &'a dyn TextMeasure,
    /// Canvas size in CSS pixels.
    pub width: f64,
    pub height: f64,
    pub draft: Option<&'a DraftConnector>,
}

/// Paint the whole board to a Vello scene.
///
/// Call once per frame with a freshly-reset `Scene`.
pub fn paint_board(scene: &mut Scene, board: &Board, cx: &PaintContext) {
    let vp = board.viewport();
    let world = Affine::translate(vp.pan) * Affine::scale(vp.scale);
    let px = 1.0 / vp.scale;

    let bounds = Rect::new(0.0, 0.0, cx.width, cx.height);
    scene.fill(Fill::NonZero, Affine::IDENTITY, color(cx.theme.background), None, &bounds);

    if let Some(grid) = GridLayout::compute(vp, cx.width, cx.height) {
        let dot = color(cx.theme.grid_dot);
        for center in grid.dots() {
            scene.fill(Fill::NonZero, Affine::IDENTITY, dot, None, &Circle::new(center, grid.dot_radius));
        }
    }

    for conn in board.connectors() {
        paint_connector(scene, board, conn, world, px, cx.theme);
    }

    if let Some(draft) = cx.draft {
        let stroke = Stroke::new(2.0 * px).with_dashes(0.0, DRAFT_DASH.map(|d| d * px));
        scene.stroke(&stroke, world, color(cx.theme.draft), None, &draft.path());
    }

    let editing = board.selection().editing;
    for card in board.cards() {
        paint_card(scene, board, card, world, cx);
        if editing != Some(card.id) {
            trace_label(card, cx.measure);
        }
    }

    for card in board.cards() {
        let alpha = cx.fade.alpha(card.id);
        if handle_visible(alpha) {
            paint_resize_handle(scene, card, alpha, world, px, cx.theme);
        }
    }

    for id in &board.selection().connectors {
        if let Some(conn) = board.connector(*id) {
            paint_connector_handles(scene, board, conn, world, px, cx.theme);
        }
    }
}

// ─── Cards ───────────────────────────────────────────────────────────────────

fn card_shape(card: &Card) -> RoundedRect {
    card.rect().to_rounded_rect(CARD_CORNER_RADIUS)
}

fn paint_card(scene: &mut Scene, board: &Board, card: &Card, world: Affine, cx: &PaintContext) {
    let chrome = card_chrome(cx.theme, board.selection(), card.id);
    let shape = card_shape(card);

    if chrome.shadow {
        let shadow_rect = card.rect() + kurbo::Vec2::new(0.0, SHADOW_OFFSET_Y);
        scene.draw_blurred_rounded_rect(
            world,
            shadow_rect,
            color(cx.theme.card_shadow),
            CARD_CORNER_RADIUS,
            SHADOW_BLUR / 2.0,
        );
    }

    scene.fill(Fill::NonZero, world, color(card.color), None, &shape);
    let stroke = Stroke::new(chrome.stroke_width / board.viewport().scale);
    scene.stroke(&stroke, world, color(chrome.stroke), None, &shape);
}

fn trace_label(card: &Card, measure: &dyn TextMeasure) {
    let layout = layout_card_text(measure, &card.text, card.width, card.height);
    for line in place_label(card, &layout) {
        log::trace!(
            "LABEL {} {:?} at ({}, {}) {}px",
            card.id,
            line.text,
            line.center.x,
            line.center.y,
            layout.font_size
        );
    }
    // Glyph output needs a font context; labels are drawn by the Canvas2D painter.
}

fn paint_resize_handle(scene: &mut Scene, card: &Card, alpha: f64, world: Affine, px: f64, theme: &Theme) {
    let a = alpha as f32;
    let circle = Circle::new(handle_center(card), HANDLE_RADIUS * px);
    scene.fill(Fill::NonZero, world, color(faded(theme.handle_fill, a)), None, &circle);
    scene.stroke(
        &Stroke::new(1.5 * px),
        world,
        color(faded(theme.handle_stroke, a)),
        None,
        &circle,
    );
}

// ─── Connectors ──────────────────────────────────────────────────────────────

fn connector_path(board: &Board, conn: &Connector) -> BezPath {
    match board.connector_points(conn) {
        Some(points) => route_path(&points, conn.source.side(), conn.target.side()),
        None => BezPath::new(),
    }
}

fn paint_connector(scene: &mut Scene, board: &Board, conn: &Connector, world: Affine, px: f64, theme: &Theme) {
    let (ink, width) = connector_stroke(theme, board.selection(), conn.id);
    let path = connector_path(board, conn);
    if path.elements().is_empty() {
        return;
    }
    scene.stroke(&Stroke::new(width * px), world, color(ink), None, &path);
}

fn paint_connector_handles(scene: &mut Scene, board: &Board, conn: &Connector, world: Affine, px: f64, theme: &Theme) {
    let Some(points) = board.connector_points(conn) else {
        return;
    };
    let radius = (CONNECTOR_HANDLE_RADIUS - 2.0) * px;
    for p in points {
        paint_dot(scene, p, radius, world, px, theme);
    }
}

fn paint_dot(scene: &mut Scene, at: Point, radius: f64, world: Affine, px: f64, theme: &Theme) {
    let circle = Circle::new(at, radius);
    scene.fill(Fill::NonZero, world, color(theme.connector_handle_fill), None, &circle);
    scene.stroke(&Stroke::new(1.5 * px), world, color(theme.connector_selected), None, &circle);
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn faded(c: CardColor, alpha: f32) -> CardColor {
    c.with_alpha(c.a * alpha)
}

fn color(c: CardColor) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::model::{Anchor, Endpoint, Side};
    use cork_core::text::FixedAdvance;

    #[test]
    fn paints_a_populated_board() {
        let mut board = Board::new();
        let a = board.add_card(Point::new(0.0, 0.0));
        let b = board.add_card(Point::new(500.0, 0.0));
        let link = board
            .add_connector(
                Endpoint::attached(a, Anchor::new(1.0, 0.5, Side::Right)),
                Endpoint::attached(b, Anchor::new(0.0, 0.5, Side::Left)),
            )
            .unwrap();
        board.set_selection(vec![a], vec![link]);

        let theme = Theme::light();
        let mut fade = HandleFade::default();
        fade.tick(&board);
        let measure = FixedAdvance::default();
        let draft = DraftConnector {
            points: vec![Point::new(300.0, 150.0), Point::new(400.0, 400.0)],
            source: Some(Side::Right),
            target: None,
        };
        let cx = PaintContext {
            theme: &theme,
            fade: &fade,
            measure: &measure,
            width: 800.0,
            height: 600.0,
            draft: Some(&draft),
        };

        let mut scene = Scene::new();
        paint_board(&mut scene, &board, &cx);
    }
}
