//! Board data model: cards, connectors, and their endpoints.
//!
//! Cards are axis-aligned rectangles in world space holding a text label.
//! Connectors join two endpoints through an ordered list of bend points.
//! An endpoint is either attached to a card (by a normalized anchor on its
//! boundary, so it follows the card as it moves or resizes) or floating at
//! a fixed world position. Connector geometry is never cached: it is always
//! derived from the current card boxes.

use crate::consts::*;
use crate::geometry::clamp;
use crate::id::ItemId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// 8-bit channels `[r, g, b, a]`.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS `rgba(...)` string for Canvas2D fill/stroke styles.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", self.a)
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }
}

/// A named fill/text color pair offered by the card color toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    pub id: &'static str,
    pub label: &'static str,
    pub color: Color,
    pub text_color: Color,
}

pub const PALETTE: [ColorOption; 7] = [
    ColorOption { id: "white", label: "White", color: Color::rgb8(0xFF, 0xFF, 0xFF), text_color: Color::rgb8(0x11, 0x18, 0x27) },
    ColorOption { id: "sky", label: "Sky", color: Color::rgb8(0xE0, 0xF2, 0xFE), text_color: Color::rgb8(0x0F, 0x17, 0x2A) },
    ColorOption { id: "powder", label: "Powder", color: Color::rgb8(0xE0, 0xE7, 0xFF), text_color: Color::rgb8(0x1E, 0x1B, 0x4B) },
    ColorOption { id: "mint", label: "Mint", color: Color::rgb8(0xD1, 0xFA, 0xE5), text_color: Color::rgb8(0x06, 0x4E, 0x3B) },
    ColorOption { id: "peach", label: "Peach", color: Color::rgb8(0xFF, 0xE4, 0xE6), text_color: Color::rgb8(0x9F, 0x12, 0x39) },
    ColorOption { id: "sunrise", label: "Sunrise", color: Color::rgb8(0xFE, 0xF3, 0xC7), text_color: Color::rgb8(0x92, 0x40, 0x0E) },
    ColorOption { id: "lavender", label: "Lavender", color: Color::rgb8(0xF5, 0xF3, 0xFF), text_color: Color::rgb8(0x4C, 0x1D, 0x95) },
];

/// Look up a palette entry by its id (`"white"`, `"mint"`, ...).
pub fn palette_option(id: &str) -> Option<&'static ColorOption> {
    PALETTE.iter().find(|o| o.id == id)
}

/// Text color that marks a dark card; its placeholder uses a translucent tint.
pub const LIGHT_TEXT: Color = Color::rgb8(0xF9, 0xFA, 0xFB);

// ─── Cards ───────────────────────────────────────────────────────────────

/// A rectangular text node. `(x, y)` is the world-space top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: ItemId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub is_placeholder: bool,
    pub color: Color,
    pub text_color: Color,
}

impl Card {
    /// A blank default-sized white card with its top-left at `origin`.
    pub fn new(id: ItemId, origin: Point) -> Self {
        let style = &PALETTE[0];
        Self {
            id,
            x: origin.x,
            y: origin.y,
            width: DEFAULT_CARD_WIDTH,
            height: DEFAULT_CARD_HEIGHT,
            text: String::new(),
            is_placeholder: true,
            color: style.color,
            text_color: style.text_color,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment (edges count as inside).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// World position of a normalized anchor on this card's box.
    pub fn anchor_point(&self, anchor: &Anchor) -> Point {
        Point::new(self.x + anchor.x * self.width, self.y + anchor.y * self.height)
    }

    /// Replace the text and keep the placeholder flag in step with it.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.is_placeholder = text.trim().is_empty();
    }

    /// Set the size, clamped into the legal card range.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = clamp_width(width);
        self.height = clamp_height(height);
    }

    /// Color used for the label: text color, or the placeholder tint.
    pub fn label_color(&self) -> Color {
        if !self.is_placeholder {
            self.text_color
        } else if self.text_color == LIGHT_TEXT {
            LIGHT_TEXT.with_alpha(0.7)
        } else {
            Color::rgb8(0x9C, 0xA3, 0xAF)
        }
    }
}

pub fn clamp_width(width: f64) -> f64 {
    clamp(width, MIN_CARD_WIDTH, f64::INFINITY)
}

pub fn clamp_height(height: f64) -> f64 {
    clamp(height, MIN_CARD_HEIGHT, MAX_CARD_HEIGHT)
}

/// A partial update to a card. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub color: Option<Color>,
    pub text_color: Option<Color>,
}

impl CardPatch {
    pub fn position(p: Point) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn colors(option: &ColorOption) -> Self {
        Self {
            color: Some(option.color),
            text_color: Some(option.text_color),
            ..Default::default()
        }
    }

    /// Apply to `card`, clamping the size and refreshing `is_placeholder`.
    pub fn apply(&self, card: &mut Card) {
        if let Some(x) = self.x {
            card.x = x;
        }
        if let Some(y) = self.y {
            card.y = y;
        }
        let width = self.width.unwrap_or(card.width);
        let height = self.height.unwrap_or(card.height);
        card.set_size(width, height);
        if let Some(ref text) = self.text {
            card.set_text(text);
        }
        if let Some(color) = self.color {
            card.color = color;
        }
        if let Some(color) = self.text_color {
            card.text_color = color;
        }
    }
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// Which edge of a card an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Outward unit normal of this edge.
    pub fn normal(self) -> Vec2 {
        match self {
            Side::Left => Vec2::new(-1.0, 0.0),
            Side::Right => Vec2::new(1.0, 0.0),
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
        }
    }
}

/// A normalized point on a card's boundary, `(x, y) ∈ [0, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub side: Side,
}

impl Anchor {
    /// Build an anchor, clamping the fractions into `[0, 1]`.
    pub fn new(x: f64, y: f64, side: Side) -> Self {
        Self {
            x: clamp(x, 0.0, 1.0),
            y: clamp(y, 0.0, 1.0),
            side,
        }
    }
}

/// One end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Endpoint {
    /// Pinned to a card; tracks the card's box.
    Attached { card: ItemId, anchor: Anchor },
    /// A fixed world-space point.
    Floating { at: Point },
}

impl Endpoint {
    pub fn attached(card: ItemId, anchor: Anchor) -> Self {
        Self::Attached { card, anchor }
    }

    pub fn floating(at: Point) -> Self {
        Self::Floating { at }
    }

    pub fn card(&self) -> Option<ItemId> {
        match self {
            Self::Attached { card, .. } => Some(*card),
            Self::Floating { .. } => None,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Attached { anchor, .. } => Some(anchor.side),
            Self::Floating { .. } => None,
        }
    }

    pub fn is_attached_to(&self, id: ItemId) -> bool {
        self.card() == Some(id)
    }

    /// Shift a floating endpoint by `delta`; attached endpoints stay pinned.
    pub fn translated(&self, delta: Vec2) -> Self {
        match *self {
            Self::Floating { at } => Self::Floating { at: at + delta },
            attached => attached,
        }
    }
}

/// Which end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorEnd {
    Source,
    Target,
}

impl ConnectorEnd {
    pub fn opposite(self) -> Self {
        match self {
            Self::Source => Self::Target,
            Self::Target => Self::Source,
        }
    }
}

/// A curved edge between two endpoints through optional bend points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: ItemId,
    pub source: Endpoint,
    pub target: Endpoint,
    pub bends: SmallVec<[Point; 2]>,
}

impl Connector {
    pub fn new(id: ItemId, source: Endpoint, target: Endpoint) -> Self {
        Self {
            id,
            source,
            target,
            bends: SmallVec::new(),
        }
    }

    pub fn endpoint(&self, end: ConnectorEnd) -> &Endpoint {
        match end {
            ConnectorEnd::Source => &self.source,
            ConnectorEnd::Target => &self.target,
        }
    }

    pub fn endpoint_mut(&mut self, end: ConnectorEnd) -> &mut Endpoint {
        match end {
            ConnectorEnd::Source => &mut self.source,
            ConnectorEnd::Target => &mut self.target,
        }
    }

    /// Whether either endpoint is attached to `card`.
    pub fn touches(&self, card: ItemId) -> bool {
        self.source.is_attached_to(card) || self.target.is_attached_to(card)
    }

    /// Whether a move gesture would change anything: some bend or floating end.
    pub fn is_movable(&self) -> bool {
        !self.bends.is_empty()
            || matches!(self.source, Endpoint::Floating { .. })
            || matches!(self.target, Endpoint::Floating { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_output() {
        assert_eq!(Color::rgb8(0xE0, 0xF2, 0xFE).to_hex(), "#E0F2FE");
        assert_eq!(Color::rgb8(0x11, 0x18, 0x27).with_alpha(0.5).to_hex(), "#11182780");
    }

    #[test]
    fn palette_lookup() {
        let mint = palette_option("mint").unwrap();
        assert_eq!(mint.color.to_hex(), "#D1FAE5");
        assert_eq!(mint.text_color.to_hex(), "#064E3B");
        assert!(palette_option("magenta").is_none());
    }

    #[test]
    fn patch_clamps_size() {
        let mut card = Card::new(ItemId::card(), Point::ORIGIN);
        CardPatch::size(10.0, 10_000.0).apply(&mut card);
        assert_eq!(card.width, MIN_CARD_WIDTH);
        assert_eq!(card.height, MAX_CARD_HEIGHT);
        CardPatch::size(5000.0, -3.0).apply(&mut card);
        assert_eq!(card.width, 5000.0);
        assert_eq!(card.height, MIN_CARD_HEIGHT);
    }

    #[test]
    fn patch_tracks_placeholder() {
        let mut card = Card::new(ItemId::card(), Point::ORIGIN);
        assert!(card.is_placeholder);
        let patch = CardPatch {
            text: Some("  \n ".into()),
            ..Default::default()
        };
        patch.apply(&mut card);
        assert!(card.is_placeholder);
        card.set_text("hello");
        assert!(!card.is_placeholder);
    }

    #[test]
    fn anchor_point_follows_card_box() {
        let mut card = Card::new(ItemId::card(), Point::new(100.0, 50.0));
        let anchor = Anchor::new(1.0, 0.5, Side::Right);
        assert_eq!(card.anchor_point(&anchor), Point::new(400.0, 200.0));
        card.x += 50.0;
        card.set_size(200.0, 100.0);
        assert_eq!(card.anchor_point(&anchor), Point::new(350.0, 100.0));
    }

    #[test]
    fn anchor_fractions_are_clamped() {
        let a = Anchor::new(-0.5, 1.7, Side::Top);
        assert_eq!((a.x, a.y), (0.0, 1.0));
    }

    #[test]
    fn floating_endpoints_translate_attached_do_not() {
        let card = ItemId::card();
        let attached = Endpoint::attached(card, Anchor::new(0.0, 0.5, Side::Left));
        let floating = Endpoint::floating(Point::new(1.0, 2.0));
        let d = Vec2::new(10.0, -5.0);
        assert_eq!(attached.translated(d), attached);
        assert_eq!(floating.translated(d), Endpoint::floating(Point::new(11.0, -3.0)));
    }

    #[test]
    fn placeholder_label_color_on_dark_text() {
        let mut card = Card::new(ItemId::card(), Point::ORIGIN);
        card.text_color = LIGHT_TEXT;
        assert!((card.label_color().a - 0.7).abs() < 1e-6);
        card.set_text("x");
        assert_eq!(card.label_color(), LIGHT_TEXT);
    }
}
