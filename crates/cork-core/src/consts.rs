//! Shared numeric constants for cards, handles, text, and the viewport.

// ─── Cards ───────────────────────────────────────────────────────────────

pub const DEFAULT_CARD_WIDTH: f64 = 300.0;
pub const DEFAULT_CARD_HEIGHT: f64 = 300.0;
pub const MIN_CARD_WIDTH: f64 = 120.0;
pub const MIN_CARD_HEIGHT: f64 = 80.0;
pub const MAX_CARD_HEIGHT: f64 = 580.0;
pub const CARD_CORNER_RADIUS: f64 = 18.0;

/// World-space offset applied to duplicated and pasted cards.
pub const PASTE_OFFSET: f64 = 24.0;

// ─── Card text ───────────────────────────────────────────────────────────

pub const CARD_TEXT_INSET: f64 = 24.0;
pub const CARD_TEXT_MAX_FONT_SIZE: f64 = 36.0;
pub const CARD_TEXT_MIN_FONT_SIZE: f64 = 14.0;
pub const CARD_TEXT_LINE_HEIGHT_MULTIPLIER: f64 = 1.35;
pub const CARD_TEXT_SHRINK_PER_LINE: f64 = 1.5;
pub const CARD_TEXT_FIT_ATTEMPTS: usize = 8;

/// Measured (and drawn, in placeholder color) in place of blank text.
pub const PLACEHOLDER_TEXT: &str = "Card";

// ─── Handles & hit slop ─────────────────────────────────────────────────

/// Resize handle diameter in screen pixels; also its hit radius.
pub const HANDLE_SIZE: f64 = 18.0;
pub const HANDLE_RADIUS: f64 = HANDLE_SIZE / 2.0;
/// Gap between the card's bottom-right corner and the resize handle.
pub const HANDLE_MARGIN: f64 = 6.0;

/// Screen-space radius of connector endpoint and bend handles.
pub const CONNECTOR_HANDLE_RADIUS: f64 = 8.0;
/// Screen-space distance within which a connector curve counts as hit.
pub const CONNECTOR_HIT_THRESHOLD: f64 = 8.0;
/// Subdivisions per cubic segment when measuring distance to a connector.
pub const CURVE_SAMPLES: usize = 32;

// ─── Viewport ────────────────────────────────────────────────────────────

pub const MIN_SCALE: f64 = 0.4;
pub const MAX_SCALE: f64 = 2.5;
/// Wheel delta that scales the zoom by a factor of e.
pub const WHEEL_ZOOM_DIVISOR: f64 = 400.0;

pub const GRID_SPACING: f64 = 80.0;
/// Below this on-screen spacing the dot grid is not drawn.
pub const GRID_MIN_SCREEN_SPACING: f64 = 12.0;

// ─── History & animation ────────────────────────────────────────────────

pub const HISTORY_DEPTH: usize = 200;
pub const HANDLE_FADE_DAMPING: f64 = 0.2;
pub const HANDLE_FADE_EPSILON: f64 = 0.01;
