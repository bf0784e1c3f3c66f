//! The canvas editor: owns the board, its history, and the live gesture.
//!
//! All entry points (pointer, keyboard, toolbar commands) funnel through
//! `CanvasEditor`. Structural commands snapshot synchronously before they
//! mutate; pointer gestures snapshot lazily on their first effective move
//! (see `pointer.rs`); text editing snapshots once per edit session.

use crate::clipboard::{Clipboard, Fragment};
use crate::config::EditorConfig;
use crate::gesture::Interaction;
use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use cork_core::Board;
use cork_core::consts::*;
use cork_core::id::ItemId;
use cork_core::model::{CardPatch, palette_option};
use cork_core::text::{FixedAdvance, TextMeasure, grown_height, layout_card_text};
use cork_core::{Point, Vec2};
use cork_render::fade::HandleFade;
use cork_render::frame::DraftConnector;
use cork_render::hit::{hit_card, infer_anchor};

/// Minimum on-screen height of the inline text editor.
const OVERLAY_MIN_HEIGHT: f64 = 48.0;

/// Screen placement and type size for the inline text editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditingOverlay {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub line_height: f64,
}

pub struct CanvasEditor {
    pub(crate) board: Board,
    pub(crate) history: History,
    pub(crate) interaction: Interaction,
    pub(crate) fade: HandleFade,
    pub(crate) config: EditorConfig,
    pub(crate) measure: Box<dyn TextMeasure>,
    clipboard: Clipboard,
    /// Canvas size in CSS pixels.
    pub(crate) viewport_size: (f64, f64),
    pub(crate) space_held: bool,
    /// Set when a gesture moved something; swallows the trailing click.
    pub(crate) suppress_click: bool,
    /// Whether the current text edit session already recorded its snapshot.
    edit_snapshot_taken: bool,
}

impl Default for CanvasEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CanvasEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_measure(config, Box::new(FixedAdvance::default()))
    }

    /// Build with a host-provided text metric (e.g. a Canvas2D context).
    pub fn with_measure(config: EditorConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            board: Board::new(),
            history: History::new(config.history_depth),
            interaction: Interaction::Idle,
            fade: HandleFade::new(config.handle_damping),
            config,
            measure,
            clipboard: Clipboard::default(),
            viewport_size: (0.0, 0.0),
            space_held: false,
            suppress_click: false,
            edit_snapshot_taken: false,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for hosts that seed or script content.
    /// Changes made here are not recorded in history.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn fade(&self) -> &HandleFade {
        &self.fade
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_connector_mode(&self) -> bool {
        self.interaction.is_connector_mode()
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = (width, height);
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        self.viewport_size
    }

    pub(crate) fn to_world(&self, screen: Point) -> Point {
        self.board.viewport().screen_to_world(screen)
    }

    /// Push the current board onto the undo stack.
    pub(crate) fn snapshot(&mut self) {
        self.history.record(self.board.clone());
    }

    /// Record the gesture's undo step the first time it is needed.
    pub(crate) fn ensure_snapshot(&mut self, taken: &mut bool) {
        if !*taken {
            self.snapshot();
            *taken = true;
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Route one input event. Returns whether the board needs a redraw.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { at, modifiers } => self.pointer_down(*at, *modifiers),
            InputEvent::PointerMove { at, modifiers } => self.pointer_move(*at, *modifiers),
            InputEvent::PointerUp { at, modifiers } => self.pointer_up(*at, *modifiers),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Click { at } => self.click(*at),
            InputEvent::DoubleClick { at } => self.double_click(*at),
            InputEvent::Wheel { at, delta_y } => self.wheel(*at, *delta_y),
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, *modifiers),
            InputEvent::KeyUp { key } => self.key_up(key),
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns `true` if the key was consumed.
    ///
    /// While a card is being edited only Escape is handled; everything
    /// else belongs to the text editor.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let editing = self.board.selection().editing.is_some();
        let Some(action) = ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta)
        else {
            return false;
        };

        if editing {
            return match action {
                ShortcutAction::Escape => self.end_editing(),
                _ => false,
            };
        }

        match action {
            ShortcutAction::PanStart => {
                self.space_held = true;
                self.board.clear_hover();
                true
            }
            ShortcutAction::AddCard => {
                self.add_card_at_viewport_center();
                true
            }
            ShortcutAction::ToggleConnectorMode => {
                self.toggle_connector_mode();
                true
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Duplicate => self.duplicate(),
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => self.paste(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Escape => self.cancel_connector_creation(),
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        if key == " " && self.space_held {
            self.space_held = false;
            return true;
        }
        false
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Add a default card centred in the visible viewport and select it.
    pub fn add_card_at_viewport_center(&mut self) -> ItemId {
        let (w, h) = self.viewport_size;
        let center = self.board.viewport().center(w, h);
        let origin = center - Vec2::new(DEFAULT_CARD_WIDTH / 2.0, DEFAULT_CARD_HEIGHT / 2.0);

        self.snapshot();
        let id = self.board.add_card(origin);
        self.board.select_card(id);
        self.board.set_editing(None);
        self.board.set_hovered_card(Some(id));
        log::debug!("add card {id}");
        id
    }

    /// Arm connector creation. Stays armed until explicitly cancelled.
    pub fn start_connector_creation(&mut self) {
        self.end_editing();
        if !self.interaction.is_connector_mode() {
            self.interaction = Interaction::ConnectorCreatePending;
        }
    }

    /// Leave connector mode, dropping any draft. Returns whether it was armed.
    pub fn cancel_connector_creation(&mut self) -> bool {
        if self.interaction.is_connector_mode() {
            self.interaction = Interaction::Idle;
            true
        } else {
            false
        }
    }

    pub fn toggle_connector_mode(&mut self) {
        if !self.cancel_connector_creation() {
            self.start_connector_creation();
        }
    }

    /// Step back one history entry. The live gesture is abandoned.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.board);
        if done {
            self.reset_after_restore();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.board);
        if done {
            self.reset_after_restore();
        }
        done
    }

    fn reset_after_restore(&mut self) {
        self.interaction = Interaction::Idle;
        self.suppress_click = false;
        self.edit_snapshot_taken = false;
    }

    fn paste_offset(&self) -> Vec2 {
        Vec2::new(self.config.paste_offset, self.config.paste_offset)
    }

    /// Insert `fragment` and select the new cards.
    fn place_fragment(&mut self, fragment: Fragment) -> bool {
        self.snapshot();
        let ids = fragment.insert_into(&mut self.board);
        let hovered = ids.last().copied();
        self.board.set_selection(ids, Vec::new());
        self.board.set_editing(None);
        self.board.set_hovered_card(hovered);
        self.edit_snapshot_taken = false;
        true
    }

    /// Duplicate the selected cards (and connectors between them).
    pub fn duplicate(&mut self) -> bool {
        let Some(fragment) = Fragment::from_selection(&self.board, &self.board.selection().cards) else {
            return false;
        };
        let copy = fragment.instantiate(self.paste_offset());
        log::debug!("duplicate {} cards", copy.cards.len());
        self.place_fragment(copy)
    }

    pub fn copy(&mut self) -> bool {
        match Fragment::from_selection(&self.board, &self.board.selection().cards) {
            Some(fragment) => {
                self.clipboard.copy(fragment);
                true
            }
            None => false,
        }
    }

    pub fn paste(&mut self) -> bool {
        match self.clipboard.paste(self.paste_offset()) {
            Some(fragment) => self.place_fragment(fragment),
            None => false,
        }
    }

    /// Delete selected cards and connectors, plus any connector touching a
    /// deleted card.
    pub fn delete_selected(&mut self) -> bool {
        let sel = self.board.selection().clone();
        if sel.is_empty() {
            return false;
        }
        self.snapshot();
        self.board.remove_connectors(&sel.connectors);
        self.board.remove_cards(&sel.cards);
        self.board.set_selection(Vec::new(), Vec::new());
        log::debug!("deleted {} cards, {} connectors", sel.cards.len(), sel.connectors.len());
        true
    }

    /// Apply a palette entry (`"mint"`, `"sky"`, ...) to a card.
    pub fn set_card_color(&mut self, card: ItemId, option: &str) -> bool {
        let Some(option) = palette_option(option) else {
            return false;
        };
        if self.board.card(card).is_none() {
            return false;
        }
        self.snapshot();
        self.board.update_card(card, &CardPatch::colors(option))
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// Enter text edit mode on a card; it becomes the sole selection.
    pub fn begin_editing(&mut self, card: ItemId) -> bool {
        if self.board.card(card).is_none() {
            return false;
        }
        self.cancel_connector_creation();
        self.board.select_card(card);
        self.board.set_hovered_card(Some(card));
        self.board.set_editing(Some(card));
        self.edit_snapshot_taken = false;
        true
    }

    /// Replace the editing card's text, growing it if the label no longer
    /// fits. The first change of a session records one undo step.
    pub fn edit_text(&mut self, text: &str) -> bool {
        let Some(id) = self.board.selection().editing else {
            return false;
        };
        let Some(card) = self.board.card(id) else {
            return false;
        };
        if card.text == text {
            return false;
        }
        let height = grown_height(self.measure.as_ref(), text, card.width, card.height);

        let mut taken = self.edit_snapshot_taken;
        self.ensure_snapshot(&mut taken);
        self.edit_snapshot_taken = taken;

        let patch = CardPatch {
            text: Some(text.to_string()),
            height: Some(height),
            ..Default::default()
        };
        self.board.update_card(id, &patch)
    }

    /// Leave text edit mode. Returns whether a card was being edited.
    pub fn end_editing(&mut self) -> bool {
        let was_editing = self.board.selection().editing.is_some();
        self.board.set_editing(None);
        self.edit_snapshot_taken = false;
        was_editing
    }

    pub fn editing_text(&self) -> Option<&str> {
        let id = self.board.selection().editing?;
        self.board.card(id).map(|c| c.text.as_str())
    }

    /// Where the host should place the inline text editor, in screen space.
    pub fn editing_overlay(&self) -> Option<EditingOverlay> {
        let id = self.board.selection().editing?;
        let card = self.board.card(id)?;
        let vp = self.board.viewport();
        let layout = layout_card_text(self.measure.as_ref(), &card.text, card.width, card.height);
        let top_left = vp.world_to_screen(card.origin());
        Some(EditingOverlay {
            left: top_left.x + CARD_TEXT_INSET,
            top: top_left.y + CARD_TEXT_INSET,
            width: card.width * vp.scale - CARD_TEXT_INSET * 2.0,
            height: (card.height * vp.scale - CARD_TEXT_INSET * 2.0).max(OVERLAY_MIN_HEIGHT),
            font_size: layout.font_size * vp.scale,
            line_height: layout.line_height * vp.scale,
        })
    }

    /// Screen point at the top centre of the active card, where the color
    /// toolbar is anchored.
    pub fn toolbar_anchor(&self) -> Option<Point> {
        let id = self.board.selection().active?;
        let card = self.board.card(id)?;
        let top_center = Point::new(card.x + card.width / 2.0, card.y);
        Some(self.board.viewport().world_to_screen(top_center))
    }

    // ─── Frame support ───────────────────────────────────────────────────

    /// Advance the handle fade. Returns `true` while another frame is needed.
    pub fn tick(&mut self) -> bool {
        self.fade.tick(&self.board)
    }

    /// End the session: abandon any gesture and stop the animation.
    pub fn unmount(&mut self) {
        self.interaction = Interaction::Idle;
        self.fade.clear();
        self.space_held = false;
    }

    /// CSS cursor for the current state.
    pub fn cursor(&self) -> &'static str {
        match self.interaction {
            Interaction::Pan { .. } => "grabbing",
            _ if self.space_held => "grab",
            Interaction::ConnectorCreatePending | Interaction::ConnectorCreateActive { .. } => "crosshair",
            _ => "default",
        }
    }

    /// The connector being drafted, if any, ready for painting.
    pub fn draft_connector(&self) -> Option<DraftConnector> {
        let Interaction::ConnectorCreateActive {
            source,
            anchor,
            pointer,
            ..
        } = self.interaction
        else {
            return None;
        };
        let start = self.board.card(source)?.anchor_point(&anchor);

        let over = hit_card(&self.board, pointer)
            .filter(|id| *id != source)
            .and_then(|id| self.board.card(id));
        let (end, side) = match over {
            Some(card) => {
                let a = infer_anchor(card, pointer);
                (card.anchor_point(&a), Some(a.side))
            }
            None => (pointer, None),
        };

        Some(DraftConnector {
            points: vec![start, end],
            source: Some(anchor.side),
            target: side,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> CanvasEditor {
        let mut ed = CanvasEditor::default();
        ed.set_viewport_size(1000.0, 800.0);
        ed
    }

    #[test]
    fn add_card_lands_at_viewport_center() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        let card = ed.board().card(id).unwrap();
        assert_eq!(card.center(), Point::new(500.0, 400.0));
        assert_eq!(ed.board().selection().active, Some(id));
        assert!(ed.can_undo());
    }

    #[test]
    fn connector_mode_toggles() {
        let mut ed = editor();
        assert!(ed.key_down("a", Modifiers::NONE));
        assert!(ed.is_connector_mode());
        assert_eq!(ed.cursor(), "crosshair");
        assert!(ed.key_down("Escape", Modifiers::NONE));
        assert!(!ed.is_connector_mode());
        ed.start_connector_creation();
        ed.start_connector_creation();
        assert!(ed.is_connector_mode());
        ed.toggle_connector_mode();
        assert!(!ed.is_connector_mode());
    }

    #[test]
    fn edit_session_records_one_step() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        assert!(ed.begin_editing(id));
        let before = ed.history().undo_depth();
        for text in ["H", "He", "Hel", "Hell", "Hello"] {
            assert!(ed.edit_text(text));
        }
        assert_eq!(ed.history().undo_depth(), before + 1);
        assert_eq!(ed.editing_text(), Some("Hello"));
        assert!(!ed.board().card(id).unwrap().is_placeholder);

        ed.undo();
        assert_eq!(ed.board().card(id).unwrap().text, "");
    }

    #[test]
    fn typing_grows_card() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        ed.board.update_card(id, &CardPatch::size(MIN_CARD_WIDTH, MIN_CARD_HEIGHT));
        ed.begin_editing(id);
        ed.edit_text("many words that cannot possibly fit inside the smallest card");
        assert!(ed.board().card(id).unwrap().height > MIN_CARD_HEIGHT);
    }

    #[test]
    fn keys_go_to_text_while_editing() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        ed.begin_editing(id);
        let cards = ed.board().cards().len();
        assert!(!ed.key_down("c", Modifiers::NONE));
        assert!(!ed.key_down("Backspace", Modifiers::NONE));
        assert_eq!(ed.board().cards().len(), cards);
        assert!(ed.key_down("Escape", Modifiers::NONE));
        assert_eq!(ed.board().selection().editing, None);
    }

    #[test]
    fn set_card_color_snapshots() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        let depth = ed.history().undo_depth();
        assert!(ed.set_card_color(id, "mint"));
        assert_eq!(ed.board().card(id).unwrap().color.to_hex(), "#D1FAE5");
        assert_eq!(ed.history().undo_depth(), depth + 1);
        assert!(!ed.set_card_color(id, "chartreuse"));
        ed.undo();
        assert_eq!(ed.board().card(id).unwrap().color.to_hex(), "#FFFFFF");
    }

    #[test]
    fn overlay_and_toolbar_follow_zoom() {
        let mut ed = editor();
        let id = ed.add_card_at_viewport_center();
        ed.begin_editing(id);
        let overlay = ed.editing_overlay().unwrap();
        assert_eq!(overlay.left, 350.0 + CARD_TEXT_INSET);
        assert_eq!(overlay.width, 300.0 - CARD_TEXT_INSET * 2.0);
        assert_eq!(overlay.font_size, CARD_TEXT_MAX_FONT_SIZE);
        assert_eq!(ed.toolbar_anchor(), Some(Point::new(500.0, 250.0)));
    }

    #[test]
    fn cursor_hints() {
        let mut ed = editor();
        assert_eq!(ed.cursor(), "default");
        ed.key_down(" ", Modifiers::NONE);
        assert_eq!(ed.cursor(), "grab");
        ed.key_up(" ");
        assert_eq!(ed.cursor(), "default");
    }
}
