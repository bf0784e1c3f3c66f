//! Input events in canvas-local screen coordinates (CSS pixels).
//!
//! The host (wasm bridge or a test) translates platform events into these
//! and feeds them to [`CanvasEditor::handle`](crate::CanvasEditor::handle).

use cork_core::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { at: Point, modifiers: Modifiers },
    PointerMove { at: Point, modifiers: Modifiers },
    PointerUp { at: Point, modifiers: Modifiers },
    PointerLeave,
    Click { at: Point },
    DoubleClick { at: Point },
    Wheel { at: Point, delta_y: f64 },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`, `" "`).
    KeyDown { key: String, modifiers: Modifiers },
    KeyUp { key: String },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            at: Point::new(x, y),
            modifiers,
        }
    }

    pub fn from_pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerMove {
            at: Point::new(x, y),
            modifiers,
        }
    }

    pub fn from_pointer_up(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerUp {
            at: Point::new(x, y),
            modifiers,
        }
    }

    pub fn key_down(key: &str, modifiers: Modifiers) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers,
        }
    }
}
