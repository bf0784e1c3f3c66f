//! Editor configuration.

use cork_core::consts::{HANDLE_FADE_DAMPING, HISTORY_DEPTH, PASTE_OFFSET, WHEEL_ZOOM_DIVISOR};

/// Whether wheel zoom steps are recorded in undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomHistory {
    /// Zooming never creates an undo step.
    #[default]
    Off,
    /// Every wheel event records a snapshot before zooming.
    PerStep,
}

/// Tunables for a [`CanvasEditor`](crate::CanvasEditor).
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept; the oldest is dropped first.
    pub history_depth: usize,
    /// World offset applied to duplicated and pasted cards, on both axes.
    pub paste_offset: f64,
    /// Fraction of the remaining distance a handle fade covers per frame.
    pub handle_damping: f64,
    pub zoom_history: ZoomHistory,
    /// Wheel delta that zooms by a factor of e.
    pub wheel_zoom_divisor: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            paste_offset: PASTE_OFFSET,
            handle_damping: HANDLE_FADE_DAMPING,
            zoom_history: ZoomHistory::Off,
            wheel_zoom_divisor: WHEEL_ZOOM_DIVISOR,
        }
    }
}
