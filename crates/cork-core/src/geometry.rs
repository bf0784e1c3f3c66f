//! Screen ↔ world transforms for the pannable, zoomable board.
//!
//! Screen space is CSS pixels inside the canvas element; world space is the
//! board's own coordinate system. The two are related by a pan offset (in
//! screen pixels) and a uniform scale:
//!
//! ```text
//! world = (screen - origin - pan) / scale
//! screen = world * scale + pan + origin
//! ```

use crate::consts::{MAX_SCALE, MIN_SCALE};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Clamp `value` into `[lo, hi]`. `hi` may be `f64::INFINITY`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Convert a screen point to world space. `origin` is the canvas element's
/// top-left corner in the same coordinate space as `screen`.
pub fn to_world(screen: Point, origin: Point, pan: Vec2, scale: f64) -> Point {
    ((screen - origin - pan) / scale).to_point()
}

/// Inverse of [`to_world`].
pub fn to_screen(world: Point, origin: Point, pan: Vec2, scale: f64) -> Point {
    (world.to_vec2() * scale + pan + origin.to_vec2()).to_point()
}

/// Pan + zoom state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Vec2,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Build a viewport, clamping `scale` into `[MIN_SCALE, MAX_SCALE]`.
    pub fn new(pan: Vec2, scale: f64) -> Self {
        Self {
            pan,
            scale: clamp(scale, MIN_SCALE, MAX_SCALE),
        }
    }

    /// Canvas-local screen point → world point.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        to_world(screen, Point::ORIGIN, self.pan, self.scale)
    }

    /// World point → canvas-local screen point.
    pub fn world_to_screen(&self, world: Point) -> Point {
        to_screen(world, Point::ORIGIN, self.pan, self.scale)
    }

    /// Multiply the scale by `factor` while keeping the world point under
    /// `screen` fixed on screen.
    pub fn zoom_at(&self, screen: Point, factor: f64) -> Self {
        let anchor = self.screen_to_world(screen);
        let scale = clamp(self.scale * factor, MIN_SCALE, MAX_SCALE);
        Self {
            pan: screen.to_vec2() - anchor.to_vec2() * scale,
            scale,
        }
    }

    /// World-space point at the centre of a `width × height` canvas.
    pub fn center(&self, width: f64, height: f64) -> Point {
        self.screen_to_world(Point::new(width / 2.0, height / 2.0))
    }
}

/// Zoom factor for a wheel event: `exp(-delta_y / divisor)`.
/// Scrolling down (positive delta) zooms out.
pub fn wheel_zoom_factor(delta_y: f64, divisor: f64) -> f64 {
    (-delta_y / divisor).exp()
}
