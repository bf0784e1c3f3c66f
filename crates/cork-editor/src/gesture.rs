//! The in-flight pointer gesture.
//!
//! Exactly one `Interaction` is live at a time. It is the only state that
//! survives between pointer events: start values are captured once at
//! pointer-down and never recomputed while the gesture runs.
//!
//! `has_snapshot` records whether the gesture already pushed its single
//! undo step. It flips on the first move that changes anything, so a
//! whole drag, resize, pan, or connector edit undoes in one step.

use cork_core::id::ItemId;
use cork_core::model::{Anchor, ConnectorEnd, Endpoint};
use cork_core::{Point, Vec2};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Space-drag of the viewport. `origin` is the screen pointer at press.
    Pan {
        origin: Point,
        start_pan: Vec2,
        has_snapshot: bool,
    },
    /// Moving a card; `offset` is pointer minus card origin at press.
    Drag {
        card: ItemId,
        offset: Vec2,
        has_snapshot: bool,
    },
    /// Dragging a card's resize handle.
    Resize {
        card: ItemId,
        start_pointer: Point,
        start_width: f64,
        start_height: f64,
        has_snapshot: bool,
    },
    /// Connector mode is armed, waiting for a press on a source card.
    ConnectorCreatePending,
    /// A connector draft from `source` follows the pointer (world space).
    ConnectorCreateActive {
        source: ItemId,
        anchor: Anchor,
        pointer: Point,
        has_snapshot: bool,
    },
    /// Re-aiming one end of an existing connector.
    ConnectorEndpoint {
        connector: ItemId,
        end: ConnectorEnd,
        original: Endpoint,
        has_snapshot: bool,
    },
    /// Translating a whole connector. Attached ends stay pinned.
    ConnectorMove {
        connector: ItemId,
        start_pointer: Point,
        source: Endpoint,
        target: Endpoint,
        bends: SmallVec<[Point; 2]>,
        has_snapshot: bool,
    },
    /// Dragging one bend point; `offset` is pointer minus bend at press.
    ConnectorBend {
        connector: ItemId,
        index: usize,
        offset: Vec2,
        has_snapshot: bool,
    },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pan { .. } => "pan",
            Self::Drag { .. } => "drag",
            Self::Resize { .. } => "resize",
            Self::ConnectorCreatePending => "connector-create-pending",
            Self::ConnectorCreateActive { .. } => "connector-create-active",
            Self::ConnectorEndpoint { .. } => "connector-endpoint",
            Self::ConnectorMove { .. } => "connector-move",
            Self::ConnectorBend { .. } => "connector-bend",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Connector mode is armed (waiting or drafting).
    pub fn is_connector_mode(&self) -> bool {
        matches!(self, Self::ConnectorCreatePending | Self::ConnectorCreateActive { .. })
    }

    /// Whether this gesture has already recorded its undo step.
    pub fn has_snapshot(&self) -> bool {
        match self {
            Self::Idle | Self::ConnectorCreatePending => false,
            Self::Pan { has_snapshot, .. }
            | Self::Drag { has_snapshot, .. }
            | Self::Resize { has_snapshot, .. }
            | Self::ConnectorCreateActive { has_snapshot, .. }
            | Self::ConnectorEndpoint { has_snapshot, .. }
            | Self::ConnectorMove { has_snapshot, .. }
            | Self::ConnectorBend { has_snapshot, .. } => *has_snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let i = Interaction::default();
        assert!(i.is_idle());
        assert!(!i.has_snapshot());
        assert_eq!(i.name(), "idle");
    }

    #[test]
    fn connector_mode_covers_both_phases() {
        assert!(Interaction::ConnectorCreatePending.is_connector_mode());
        let active = Interaction::ConnectorCreateActive {
            source: ItemId::intern("src"),
            anchor: Anchor::new(1.0, 0.5, cork_core::model::Side::Right),
            pointer: Point::ORIGIN,
            has_snapshot: false,
        };
        assert!(active.is_connector_mode());
        assert!(!Interaction::Idle.is_connector_mode());
    }
}
