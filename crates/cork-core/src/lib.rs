pub mod board;
pub mod consts;
pub mod geometry;
pub mod id;
pub mod model;
pub mod route;
pub mod text;

pub use board::{Board, Selection};
pub use geometry::{Viewport, clamp, to_screen, to_world, wheel_zoom_factor};
pub use id::ItemId;
pub use model::*;
pub use text::{FixedAdvance, TextLayout, TextMeasure, layout_card_text};

// Re-export kurbo types so downstream crates share one geometry vocabulary
pub use kurbo::{Point, Rect, Vec2};
