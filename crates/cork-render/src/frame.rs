//! Painter-independent frame layout: theme colors, dot grid placement,
//! card chrome, label line positions, and the connector draft preview.
//!
//! Read by both the Vello painter and the Canvas2D painter.

use cork_core::board::Selection;
use cork_core::consts::*;
use cork_core::geometry::Viewport;
use cork_core::id::ItemId;
use cork_core::model::{Card, Color, Side};
use cork_core::route::{route_path, route_segments};
use cork_core::text::TextLayout;
use kurbo::{BezPath, CubicBez, Point, Vec2};

// ─── Theme ───────────────────────────────────────────────────────────────

/// Colors for board chrome. Card fill and text colors come from the card.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid_dot: Color,
    pub card_stroke: Color,
    pub card_selected_stroke: Color,
    pub card_active_stroke: Color,
    pub card_shadow: Color,
    pub handle_fill: Color,
    pub handle_stroke: Color,
    pub connector: Color,
    pub connector_hover: Color,
    pub connector_selected: Color,
    pub connector_handle_fill: Color,
    pub draft: Color,
}

impl Theme {
    /// Light theme: soft grey paper with slate ink.
    pub fn light() -> Self {
        Self {
            background: Color::rgb8(0xF7, 0xF7, 0xF7),
            grid_dot: Color::rgb8(0xD1, 0xD5, 0xDB),
            card_stroke: Color::rgb8(17, 17, 17).with_alpha(0.12),
            card_selected_stroke: Color::rgb8(37, 99, 235).with_alpha(0.4),
            card_active_stroke: Color::rgb8(37, 99, 235).with_alpha(0.55),
            card_shadow: Color::rgb8(15, 23, 42).with_alpha(0.18),
            handle_fill: Color::rgb8(0x0F, 0x17, 0x2A),
            handle_stroke: Color::rgb8(255, 255, 255).with_alpha(0.9),
            connector: Color::rgb8(0x47, 0x55, 0x69),
            connector_hover: Color::rgb8(0x1E, 0x29, 0x3B),
            connector_selected: Color::rgb8(37, 99, 235),
            connector_handle_fill: Color::rgb8(255, 255, 255),
            draft: Color::rgb8(37, 99, 235).with_alpha(0.7),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::rgb8(0x1C, 0x1C, 0x1E),
            grid_dot: Color::rgb8(0x3A, 0x3A, 0x3C),
            card_stroke: Color::rgb8(255, 255, 255).with_alpha(0.12),
            card_selected_stroke: Color::rgb8(96, 165, 250).with_alpha(0.5),
            card_active_stroke: Color::rgb8(96, 165, 250).with_alpha(0.7),
            card_shadow: Color::rgb8(0, 0, 0).with_alpha(0.4),
            handle_fill: Color::rgb8(0xF9, 0xFA, 0xFB),
            handle_stroke: Color::rgb8(0x1C, 0x1C, 0x1E).with_alpha(0.9),
            connector: Color::rgb8(0x94, 0xA3, 0xB8),
            connector_hover: Color::rgb8(0xE2, 0xE8, 0xF0),
            connector_selected: Color::rgb8(96, 165, 250),
            connector_handle_fill: Color::rgb8(0x1C, 0x1C, 0x1E),
            draft: Color::rgb8(96, 165, 250).with_alpha(0.7),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

// ─── Grid ────────────────────────────────────────────────────────────────

/// Screen-space placement of the dot grid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Screen position of the first (top-left, off-canvas) dot.
    pub offset: Point,
    pub spacing: f64,
    pub columns: usize,
    pub rows: usize,
    pub dot_radius: f64,
}

impl GridLayout {
    /// `None` when the scaled spacing is too tight to be legible.
    pub fn compute(viewport: &Viewport, width: f64, height: f64) -> Option<Self> {
        let spacing = GRID_SPACING * viewport.scale;
        if spacing < GRID_MIN_SCREEN_SPACING {
            return None;
        }
        Some(Self {
            offset: Point::new(
                viewport.pan.x % spacing - spacing,
                viewport.pan.y % spacing - spacing,
            ),
            spacing,
            columns: (width / spacing).ceil() as usize + 3,
            rows: (height / spacing).ceil() as usize + 3,
            dot_radius: (1.5 * viewport.scale).max(1.0),
        })
    }

    /// Every dot centre, column by column.
    pub fn dots(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.columns).flat_map(move |i| {
            (0..self.rows).map(move |j| self.offset + Vec2::new(i as f64 * self.spacing, j as f64 * self.spacing))
        })
    }
}

// ─── Cards ───────────────────────────────────────────────────────────────

/// Outline and elevation of a card for the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardChrome {
    pub stroke: Color,
    pub stroke_width: f64,
    pub shadow: bool,
}

pub fn card_chrome(theme: &Theme, selection: &Selection, card: ItemId) -> CardChrome {
    if selection.active == Some(card) {
        CardChrome {
            stroke: theme.card_active_stroke,
            stroke_width: 2.0,
            shadow: true,
        }
    } else if selection.has_card(card) {
        CardChrome {
            stroke: theme.card_selected_stroke,
            stroke_width: 2.0,
            shadow: false,
        }
    } else {
        CardChrome {
            stroke: theme.card_stroke,
            stroke_width: 1.0,
            shadow: false,
        }
    }
}

/// Shadow geometry for the active card, in world units.
pub const SHADOW_BLUR: f64 = 32.0;
pub const SHADOW_OFFSET_Y: f64 = 16.0;

/// One label line and the world point its centre sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine<'a> {
    pub text: &'a str,
    pub center: Point,
}

/// Centre each laid-out line horizontally and the block vertically.
pub fn place_label<'a>(card: &Card, layout: &'a TextLayout) -> Vec<LabelLine<'a>> {
    let total = layout.lines.len() as f64 * layout.line_height;
    let start_y = card.y + card.height / 2.0 - total / 2.0 + layout.line_height / 2.0;
    let x = card.x + card.width / 2.0;
    layout
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| LabelLine {
            text: line.as_str(),
            center: Point::new(x, start_y + i as f64 * layout.line_height),
        })
        .collect()
}

/// Whether a handle at fade value `alpha` should be drawn at all.
pub fn handle_visible(alpha: f64) -> bool {
    alpha > HANDLE_FADE_EPSILON
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// Stroke color and screen-pixel width of a connector.
pub fn connector_stroke(theme: &Theme, selection: &Selection, id: ItemId) -> (Color, f64) {
    if selection.has_connector(id) {
        (theme.connector_selected, 2.5)
    } else if selection.hovered_connector == Some(id) {
        (theme.connector_hover, 2.5)
    } else {
        (theme.connector, 2.0)
    }
}

/// Screen-pixel dash pattern of the draft connector.
pub const DRAFT_DASH: [f64; 2] = [6.0, 6.0];

/// A connector being created, from its source toward the pointer (or the
/// anchor on the card under it).
#[derive(Debug, Clone, PartialEq)]
pub struct DraftConnector {
    pub points: Vec<Point>,
    pub source: Option<Side>,
    pub target: Option<Side>,
}

impl DraftConnector {
    pub fn segments(&self) -> Vec<CubicBez> {
        route_segments(&self.points, self.source, self.target)
    }

    pub fn path(&self) -> BezPath {
        route_path(&self.points, self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::text::{FixedAdvance, layout_card_text};
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_skipped_when_too_dense() {
        let vp = Viewport::new(Vec2::ZERO, 0.1);
        // Scale clamps to 0.4 → 32 px spacing, still drawn.
        assert!(GridLayout::compute(&vp, 800.0, 600.0).is_some());
        let tight = Viewport { pan: Vec2::ZERO, scale: 0.1 };
        assert!(GridLayout::compute(&tight, 800.0, 600.0).is_none());
    }

    #[test]
    fn grid_offset_wraps_pan() {
        let vp = Viewport::new(Vec2::new(170.0, -30.0), 1.0);
        let grid = GridLayout::compute(&vp, 800.0, 600.0).unwrap();
        assert_eq!(grid.offset, Point::new(-70.0, -110.0));
        assert_eq!((grid.columns, grid.rows), (13, 11));
        assert_eq!(grid.dot_radius, 1.5);
        assert_eq!(grid.dots().count(), 13 * 11);
    }

    #[test]
    fn active_card_is_elevated() {
        let theme = Theme::light();
        let id = ItemId::card();
        let mut sel = Selection::default();
        assert_eq!(card_chrome(&theme, &sel, id).stroke_width, 1.0);
        sel.cards.push(id);
        assert!(!card_chrome(&theme, &sel, id).shadow);
        sel.active = Some(id);
        let chrome = card_chrome(&theme, &sel, id);
        assert!(chrome.shadow);
        assert_eq!(chrome.stroke, theme.card_active_stroke);
    }

    #[test]
    fn label_block_is_centered() {
        let card = Card::new(ItemId::card(), Point::new(0.0, 0.0));
        let layout = layout_card_text(&FixedAdvance::default(), "one\ntwo", card.width, card.height);
        let lines = place_label(&card, &layout);
        assert_eq!(lines.len(), 2);
        let mid = (lines[0].center.y + lines[1].center.y) / 2.0;
        assert!((mid - 150.0).abs() < 1e-9);
        assert_eq!(lines[0].center.x, 150.0);
    }
}
