//! Pointer and wheel handling for [`CanvasEditor`].
//!
//! Pointer-down picks the gesture, pointer-move advances it, pointer-up
//! (or leave) finalizes it. Coordinates arrive in canvas-local screen
//! pixels and are converted to world space against the live viewport.

use crate::config::ZoomHistory;
use crate::editor::CanvasEditor;
use crate::gesture::Interaction;
use crate::input::Modifiers;
use cork_core::geometry::{Viewport, wheel_zoom_factor};
use cork_core::id::ItemId;
use cork_core::model::{Anchor, CardPatch, ConnectorEnd, Endpoint};
use cork_core::{Point, Vec2};
use cork_render::hit::{
    ConnectorHit, ConnectorPart, hit_card, hit_connector, hit_connector_handle, hit_resize_handle, infer_anchor,
};

impl CanvasEditor {
    fn scale(&self) -> f64 {
        self.board.viewport().scale
    }

    /// Start a gesture. Returns whether the board needs a redraw.
    pub fn pointer_down(&mut self, at: Point, modifiers: Modifiers) -> bool {
        let world = self.to_world(at);
        let scale = self.scale();
        self.suppress_click = false;

        if self.space_held && !self.interaction.is_connector_mode() {
            self.interaction = Interaction::Pan {
                origin: at,
                start_pan: self.board.viewport().pan,
                has_snapshot: false,
            };
            return true;
        }

        if self.interaction.is_connector_mode() {
            return self.begin_connector_draft(world);
        }

        let selected = self.board.selection().connectors.clone();
        if let Some(hit) = hit_connector_handle(&self.board, world, scale, &selected) {
            return self.begin_connector_gesture(hit, world);
        }

        if let Some(id) = hit_card(&self.board, world) {
            self.press_card(id, world, modifiers);
            return true;
        }

        if let Some(hit) = hit_connector(&self.board, world, scale) {
            self.board.select_connector(hit.id);
            self.board.set_editing(None);
            self.board.set_hovered_connector(Some(hit.id));
            return self.begin_connector_gesture(hit, world);
        }

        self.board.clear_selection();
        self.board.clear_hover();
        self.interaction = Interaction::Idle;
        true
    }

    fn press_card(&mut self, id: ItemId, world: Point, modifiers: Modifiers) {
        self.board.set_hovered_card(Some(id));

        if modifiers.shift {
            self.board.toggle_card(id);
            self.board.set_editing(None);
            self.interaction = Interaction::Idle;
            return;
        }

        let editing = self.board.selection().editing;
        self.board.select_card(id);
        if editing != Some(id) {
            self.board.set_editing(None);
        }
        self.board.bring_to_front(id);

        let Some(card) = self.board.card(id) else {
            return;
        };
        self.interaction = if hit_resize_handle(card, world, self.scale()) {
            Interaction::Resize {
                card: id,
                start_pointer: world,
                start_width: card.width,
                start_height: card.height,
                has_snapshot: false,
            }
        } else {
            Interaction::Drag {
                card: id,
                offset: world - card.origin(),
                has_snapshot: false,
            }
        };
    }

    /// Press while connector mode is armed: a card becomes the source.
    fn begin_connector_draft(&mut self, world: Point) -> bool {
        let Some(source) = hit_card(&self.board, world) else {
            return false;
        };
        let Some(card) = self.board.card(source) else {
            return false;
        };
        self.interaction = Interaction::ConnectorCreateActive {
            source,
            anchor: infer_anchor(card, world),
            pointer: world,
            has_snapshot: false,
        };
        true
    }

    fn begin_connector_gesture(&mut self, hit: ConnectorHit, world: Point) -> bool {
        let Some(conn) = self.board.connector(hit.id) else {
            return false;
        };
        let next = match hit.part {
            ConnectorPart::Endpoint(end) => Some(Interaction::ConnectorEndpoint {
                connector: hit.id,
                end,
                original: *conn.endpoint(end),
                has_snapshot: false,
            }),
            ConnectorPart::Bend(index) => conn.bends.get(index).map(|bend| Interaction::ConnectorBend {
                connector: hit.id,
                index,
                offset: world - *bend,
                has_snapshot: false,
            }),
            ConnectorPart::Segment(_) => Some(Interaction::ConnectorMove {
                connector: hit.id,
                start_pointer: world,
                source: conn.source,
                target: conn.target,
                bends: conn.bends.clone(),
                has_snapshot: false,
            }),
        };
        let Some(next) = next else {
            return false;
        };
        log::trace!("begin {} on {}", next.name(), hit.id);
        self.interaction = next;
        true
    }

    /// Update hover and advance the live gesture.
    pub fn pointer_move(&mut self, at: Point, modifiers: Modifiers) -> bool {
        let world = self.to_world(at);
        let hover_changed = !self.space_held && self.update_hover(world);

        let mut interaction = std::mem::take(&mut self.interaction);
        let changed = self.advance(&mut interaction, at, world, modifiers);
        self.interaction = interaction;
        changed || hover_changed
    }

    fn update_hover(&mut self, world: Point) -> bool {
        let before = (self.board.selection().hovered_card, self.board.selection().hovered_connector);
        if let Some(id) = hit_card(&self.board, world) {
            self.board.set_hovered_card(Some(id));
        } else if let Some(hit) = hit_connector(&self.board, world, self.scale()) {
            self.board.set_hovered_connector(Some(hit.id));
        } else {
            self.board.clear_hover();
        }
        before != (self.board.selection().hovered_card, self.board.selection().hovered_connector)
    }

    fn advance(&mut self, interaction: &mut Interaction, at: Point, world: Point, modifiers: Modifiers) -> bool {
        match interaction {
            Interaction::Idle | Interaction::ConnectorCreatePending => false,

            Interaction::Pan {
                origin,
                start_pan,
                has_snapshot,
            } => {
                let pan = *start_pan + (at - *origin);
                if pan == self.board.viewport().pan {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                let scale = self.scale();
                self.board.set_viewport(Viewport::new(pan, scale));
                true
            }

            Interaction::Drag {
                card,
                offset,
                has_snapshot,
            } => {
                let target = world - *offset;
                if self.board.card(*card).is_none_or(|c| c.origin() == target) {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                self.board.update_card(*card, &CardPatch::position(target))
            }

            Interaction::Resize {
                card,
                start_pointer,
                start_width,
                start_height,
                has_snapshot,
            } => {
                let mut delta = world - *start_pointer;
                if modifiers.shift {
                    let dominant = if delta.x.abs() > delta.y.abs() { delta.x } else { delta.y };
                    delta = Vec2::new(dominant, dominant);
                }
                let patch = CardPatch::size(*start_width + delta.x, *start_height + delta.y);
                let Some(current) = self.board.card(*card) else {
                    return false;
                };
                let mut resized = current.clone();
                patch.apply(&mut resized);
                if resized.width == current.width && resized.height == current.height {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                self.board.update_card(*card, &patch)
            }

            Interaction::ConnectorCreateActive { pointer, .. } => {
                *pointer = world;
                true
            }

            Interaction::ConnectorEndpoint {
                connector,
                end,
                has_snapshot,
                ..
            } => {
                let Some(conn) = self.board.connector(*connector) else {
                    return false;
                };
                let next = self.endpoint_under(world, conn.endpoint(end.opposite()).card());
                if *conn.endpoint(*end) == next {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                self.board.update_connector_endpoint(*connector, *end, next)
            }

            Interaction::ConnectorMove {
                connector,
                start_pointer,
                source,
                target,
                bends,
                has_snapshot,
            } => {
                let delta = world - *start_pointer;
                let movable = self.board.connector(*connector).is_some_and(|c| c.is_movable());
                if !movable || (delta == Vec2::ZERO && !*has_snapshot) {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                let moved: Vec<Point> = bends.iter().map(|b| *b + delta).collect();
                self.board
                    .update_connector_endpoint(*connector, ConnectorEnd::Source, source.translated(delta));
                self.board
                    .update_connector_endpoint(*connector, ConnectorEnd::Target, target.translated(delta));
                self.board.set_bends(*connector, &moved)
            }

            Interaction::ConnectorBend {
                connector,
                index,
                offset,
                has_snapshot,
            } => {
                let at = world - *offset;
                let current = self
                    .board
                    .connector(*connector)
                    .and_then(|c| c.bends.get(*index).copied());
                if current.is_none_or(|b| b == at) {
                    return false;
                }
                self.ensure_snapshot(has_snapshot);
                self.board.set_bend(*connector, *index, at)
            }
        }
    }

    /// Attached to the card under `world` (nearest edge), else floating.
    /// `other_end` is never a target, so a connector can't loop onto one card.
    fn endpoint_under(&self, world: Point, other_end: Option<ItemId>) -> Endpoint {
        let hit = hit_card(&self.board, world).filter(|id| Some(*id) != other_end);
        match hit.and_then(|id| self.board.card(id)) {
            Some(card) => Endpoint::attached(card.id, infer_anchor(card, world)),
            None => Endpoint::floating(world),
        }
    }

    /// Finalize the live gesture.
    pub fn pointer_up(&mut self, at: Point, _modifiers: Modifiers) -> bool {
        if let Interaction::ConnectorCreateActive { pointer, .. } = &mut self.interaction {
            *pointer = self.board.viewport().screen_to_world(at);
        }
        self.finish_gesture()
    }

    /// Pointer left the canvas: end the gesture and drop hover.
    pub fn pointer_leave(&mut self) -> bool {
        let finished = self.finish_gesture();
        let hovered = self.board.selection().hovered_card.is_some() || self.board.selection().hovered_connector.is_some();
        self.board.clear_hover();
        finished || hovered
    }

    fn finish_gesture(&mut self) -> bool {
        let interaction = std::mem::take(&mut self.interaction);
        let had_snapshot = interaction.has_snapshot();
        let pointer_gesture = !interaction.is_idle() && !interaction.is_connector_mode();
        let (next, redraw) = match interaction {
            Interaction::Idle => (Interaction::Idle, false),
            Interaction::ConnectorCreatePending => (Interaction::ConnectorCreatePending, false),

            Interaction::ConnectorCreateActive {
                source,
                anchor,
                pointer,
                has_snapshot,
            } => {
                self.commit_connector(source, anchor, pointer, has_snapshot);
                (Interaction::ConnectorCreatePending, true)
            }

            Interaction::ConnectorEndpoint {
                connector,
                end,
                original,
                ..
            } => {
                let dropped_loose = self
                    .board
                    .connector(connector)
                    .is_some_and(|c| c.endpoint(end).card().is_none());
                if dropped_loose && original.card().is_some() {
                    log::debug!("endpoint of {connector} dropped on empty canvas, reverting");
                    self.board.update_connector_endpoint(connector, end, original);
                }
                (Interaction::Idle, true)
            }

            Interaction::Pan { .. }
            | Interaction::Drag { .. }
            | Interaction::Resize { .. }
            | Interaction::ConnectorMove { .. }
            | Interaction::ConnectorBend { .. } => (Interaction::Idle, true),
        };

        if pointer_gesture {
            self.suppress_click = true;
        }
        if had_snapshot {
            self.history.discard_if_unchanged(&self.board);
        }
        self.interaction = next;
        redraw
    }

    /// Add the drafted connector if the pointer ended over another card.
    fn commit_connector(&mut self, source: ItemId, anchor: Anchor, pointer: Point, mut has_snapshot: bool) {
        let target = hit_card(&self.board, pointer)
            .filter(|id| *id != source)
            .and_then(|id| self.board.card(id))
            .map(|card| Endpoint::attached(card.id, infer_anchor(card, pointer)));
        let Some(target) = target else {
            log::trace!("connector draft from {source} discarded");
            return;
        };
        self.ensure_snapshot(&mut has_snapshot);
        if let Some(id) = self.board.add_connector(Endpoint::attached(source, anchor), target) {
            log::debug!("add connector {id}");
        }
    }

    /// Click on empty canvas clears the selection, unless it ends a
    /// pointer gesture.
    pub fn click(&mut self, at: Point) -> bool {
        if std::mem::take(&mut self.suppress_click) {
            return false;
        }
        if self.space_held || self.interaction.is_connector_mode() {
            return false;
        }
        let world = self.to_world(at);
        if hit_card(&self.board, world).is_some() || hit_connector(&self.board, world, self.scale()).is_some() {
            return false;
        }
        let sel = self.board.selection();
        if sel.is_empty() && sel.editing.is_none() {
            return false;
        }
        self.board.clear_selection();
        true
    }

    /// Double-click: a bend handle is removed, a card enters text editing,
    /// a connector segment gains a bend at the pointer.
    pub fn double_click(&mut self, at: Point) -> bool {
        if self.interaction.is_connector_mode() {
            return false;
        }
        let world = self.to_world(at);
        let scale = self.scale();

        let selected = self.board.selection().connectors.clone();
        let handle = hit_connector_handle(&self.board, world, scale, &selected);
        if let Some(ConnectorHit {
            id,
            part: ConnectorPart::Bend(index),
        }) = handle
        {
            self.snapshot();
            return self.board.remove_bend(id, index);
        }

        if let Some(card) = hit_card(&self.board, world) {
            return self.begin_editing(card);
        }

        match hit_connector(&self.board, world, scale) {
            Some(ConnectorHit {
                id,
                part: ConnectorPart::Bend(index),
            }) => {
                self.snapshot();
                self.board.select_connector(id);
                self.board.remove_bend(id, index)
            }
            Some(ConnectorHit {
                id,
                part: ConnectorPart::Segment(index),
            }) => {
                self.snapshot();
                self.board.select_connector(id);
                self.board.insert_bend(id, index, world)
            }
            _ => false,
        }
    }

    /// Zoom about the pointer. Records a step only under
    /// [`ZoomHistory::PerStep`].
    pub fn wheel(&mut self, at: Point, delta_y: f64) -> bool {
        let factor = wheel_zoom_factor(delta_y, self.config.wheel_zoom_divisor);
        let next = self.board.viewport().zoom_at(at, factor);
        if next.scale == self.board.viewport().scale {
            return false;
        }
        if self.config.zoom_history == ZoomHistory::PerStep {
            self.snapshot();
        }
        self.board.set_viewport(next);
        true
    }
}
