//! Integration tests: snapshot history through the editor.
//!
//! Covers the commit policy (one step per gesture, synchronous steps for
//! structural commands, one step per text session) and the undo/redo
//! round-trip guarantees.

use cork_core::model::*;
use cork_core::{ItemId, Point, Vec2};
use cork_editor::{CanvasEditor, EditorConfig, InputEvent, Modifiers, ZoomHistory};
use pretty_assertions::assert_eq;

fn editor_with(config: EditorConfig) -> CanvasEditor {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ed = CanvasEditor::new(config);
    ed.set_viewport_size(1000.0, 800.0);
    ed
}

fn editor() -> CanvasEditor {
    editor_with(EditorConfig::default())
}

fn cmd() -> Modifiers {
    Modifiers {
        meta: true,
        ..Modifiers::NONE
    }
}

fn cmd_shift() -> Modifiers {
    Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::NONE
    }
}

fn key(ed: &mut CanvasEditor, key: &str, modifiers: Modifiers) -> bool {
    ed.handle(&InputEvent::key_down(key, modifiers))
}

fn drag(ed: &mut CanvasEditor, from: (f64, f64), to: (f64, f64)) {
    ed.handle(&InputEvent::from_pointer_down(from.0, from.1, Modifiers::NONE));
    ed.handle(&InputEvent::from_pointer_move(to.0, to.1, Modifiers::NONE));
    ed.handle(&InputEvent::from_pointer_up(to.0, to.1, Modifiers::NONE));
}

// ─── Round-trip and idempotence ─────────────────────────────────────────

#[test]
fn undo_then_redo_restores_exact_state() {
    let mut ed = editor();
    let id = ed.add_card_at_viewport_center();
    drag(&mut ed, (500.0, 400.0), (560.0, 420.0));
    ed.set_card_color(id, "sky");
    let after = ed.board().clone();

    assert!(key(&mut ed, "z", cmd()));
    assert_ne!(ed.board(), &after);
    assert!(key(&mut ed, "z", cmd_shift()));
    assert_eq!(ed.board(), &after);
}

#[test]
fn undo_walks_back_each_step() {
    let mut ed = editor();
    let id = ed.add_card_at_viewport_center();
    drag(&mut ed, (500.0, 400.0), (600.0, 400.0));

    assert!(ed.undo());
    assert_eq!(ed.board().card(id).unwrap().origin(), Point::new(350.0, 250.0));
    assert!(ed.undo());
    assert!(ed.board().cards().is_empty());
    assert!(!ed.can_undo());

    assert!(ed.redo());
    assert!(ed.redo());
    assert_eq!(ed.board().card(id).unwrap().origin(), Point::new(450.0, 250.0));
    assert!(!ed.can_redo());
}

#[test]
fn empty_history_is_a_noop() {
    let mut ed = editor();
    ed.board_mut().add_card(Point::new(10.0, 10.0));
    let before = ed.board().clone();

    assert!(!ed.undo());
    assert!(!ed.redo());
    assert!(!key(&mut ed, "y", cmd()));
    assert_eq!(ed.board(), &before);
}

#[test]
fn new_action_clears_redo() {
    let mut ed = editor();
    ed.add_card_at_viewport_center();
    ed.add_card_at_viewport_center();
    ed.undo();
    assert!(ed.can_redo());
    ed.add_card_at_viewport_center();
    assert!(!ed.can_redo());
}

#[test]
fn reverted_endpoint_drag_keeps_redo() {
    let mut ed = editor();
    let a = ed.board_mut().add_card(Point::new(0.0, 0.0));
    let b = ed.board_mut().add_card(Point::new(500.0, 0.0));
    let target = Endpoint::attached(b, Anchor::new(0.0, 0.5, Side::Left));
    let link = ed
        .board_mut()
        .add_connector(Endpoint::attached(a, Anchor::new(1.0, 0.5, Side::Right)), target)
        .unwrap();
    ed.set_card_color(a, "sky");
    assert!(ed.undo());
    assert!(ed.can_redo());

    // Select the connector, then drop its target end on empty canvas.
    drag(&mut ed, (400.0, 150.0), (400.0, 150.0));
    assert_eq!(ed.board().selection().connectors, vec![link]);
    drag(&mut ed, (500.0, 150.0), (400.0, 600.0));

    assert_eq!(ed.board().connector(link).unwrap().target, target);
    assert!(!ed.can_undo());
    assert!(ed.can_redo());
    assert!(ed.redo());
    assert_eq!(ed.board().card(a).unwrap().color, palette_option("sky").unwrap().color);
}

#[test]
fn history_depth_is_bounded() {
    let mut ed = editor_with(EditorConfig {
        history_depth: 3,
        ..EditorConfig::default()
    });
    for _ in 0..5 {
        ed.add_card_at_viewport_center();
    }
    assert_eq!(ed.history().undo_depth(), 3);
    while ed.undo() {}
    assert_eq!(ed.board().cards().len(), 2);
}

#[test]
fn undo_abandons_live_gesture() {
    let mut ed = editor();
    let id = ed.add_card_at_viewport_center();
    ed.handle(&InputEvent::from_pointer_down(500.0, 400.0, Modifiers::NONE));
    ed.handle(&InputEvent::from_pointer_move(520.0, 400.0, Modifiers::NONE));
    assert_eq!(ed.interaction().name(), "drag");

    assert!(ed.undo());
    assert!(ed.interaction().is_idle());
    ed.handle(&InputEvent::from_pointer_move(700.0, 400.0, Modifiers::NONE));
    assert_eq!(ed.board().card(id).unwrap().origin(), Point::new(350.0, 250.0));
}

// ─── Structural commands ─────────────────────────────────────────────────

#[test]
fn delete_and_undo_restores_connectors() {
    let mut ed = editor();
    let a = ed.board_mut().add_card(Point::new(0.0, 0.0));
    let b = ed.board_mut().add_card(Point::new(500.0, 0.0));
    ed.board_mut().add_connector(
        Endpoint::attached(a, Anchor::new(1.0, 0.5, Side::Right)),
        Endpoint::attached(b, Anchor::new(0.0, 0.5, Side::Left)),
    );
    ed.board_mut().select_card(a);

    assert!(key(&mut ed, "Delete", Modifiers::NONE));
    assert!(ed.board().connectors().is_empty());
    assert!(ed.undo());
    assert_eq!(ed.board().connectors().len(), 1);
    assert_eq!(ed.board().cards().len(), 2);
    assert_eq!(ed.board().selection().active, Some(a));
}

#[test]
fn paste_offsets_accumulate() {
    let mut ed = editor();
    let id = ed.board_mut().add_card(Point::new(100.0, 100.0));
    ed.board_mut().select_card(id);

    assert!(!key(&mut ed, "v", cmd()));
    assert!(key(&mut ed, "c", cmd()));
    assert!(key(&mut ed, "v", cmd()));
    assert!(key(&mut ed, "v", cmd()));

    let origins: Vec<Point> = ed.board().cards().iter().map(|c| c.origin()).collect();
    assert_eq!(
        origins,
        vec![Point::new(100.0, 100.0), Point::new(124.0, 124.0), Point::new(148.0, 148.0)]
    );
    assert_eq!(ed.history().undo_depth(), 2);
    let last: ItemId = ed.board().cards()[2].id;
    assert_eq!(ed.board().selection().active, Some(last));
}

#[test]
fn connector_creation_is_one_step() {
    let mut ed = editor();
    ed.board_mut().add_card(Point::new(0.0, 0.0));
    ed.board_mut().add_card(Point::new(500.0, 0.0));
    ed.start_connector_creation();
    drag(&mut ed, (150.0, 150.0), (650.0, 150.0));
    assert_eq!(ed.board().connectors().len(), 1);
    assert!(ed.undo());
    assert!(ed.board().connectors().is_empty());
}

// ─── Text sessions ───────────────────────────────────────────────────────

#[test]
fn text_session_is_one_step() {
    let mut ed = editor();
    let id = ed.add_card_at_viewport_center();
    let depth = ed.history().undo_depth();

    ed.handle(&InputEvent::DoubleClick {
        at: Point::new(500.0, 400.0),
    });
    for text in ["T", "To", "To do", "To do:"] {
        ed.edit_text(text);
    }
    assert!(key(&mut ed, "Escape", Modifiers::NONE));
    assert_eq!(ed.history().undo_depth(), depth + 1);

    ed.begin_editing(id);
    ed.edit_text("To do: ship it");
    ed.end_editing();
    assert_eq!(ed.history().undo_depth(), depth + 2);

    ed.undo();
    assert_eq!(ed.board().card(id).unwrap().text, "To do:");
    ed.undo();
    let card = ed.board().card(id).unwrap();
    assert_eq!(card.text, "");
    assert!(card.is_placeholder);
}

// ─── Viewport policy ─────────────────────────────────────────────────────

#[test]
fn zoom_is_not_recorded_by_default() {
    let mut ed = editor();
    ed.handle(&InputEvent::Wheel {
        at: Point::new(500.0, 400.0),
        delta_y: -120.0,
    });
    assert!(ed.board().viewport().scale > 1.0);
    assert!(!ed.can_undo());
}

#[test]
fn zoom_can_be_recorded_per_step() {
    let mut ed = editor_with(EditorConfig {
        zoom_history: ZoomHistory::PerStep,
        ..EditorConfig::default()
    });
    for _ in 0..3 {
        ed.handle(&InputEvent::Wheel {
            at: Point::new(500.0, 400.0),
            delta_y: 100.0,
        });
    }
    assert_eq!(ed.history().undo_depth(), 3);
    while ed.undo() {}
    assert_eq!(ed.board().viewport().scale, 1.0);
    assert_eq!(ed.board().viewport().pan, Vec2::ZERO);
}

#[test]
fn pan_is_one_step() {
    let mut ed = editor();
    key(&mut ed, " ", Modifiers::NONE);
    ed.handle(&InputEvent::from_pointer_down(10.0, 10.0, Modifiers::NONE));
    for i in 1..=10 {
        let p = 10.0 + i as f64 * 5.0;
        ed.handle(&InputEvent::from_pointer_move(p, p, Modifiers::NONE));
    }
    ed.handle(&InputEvent::from_pointer_up(60.0, 60.0, Modifiers::NONE));
    assert_eq!(ed.history().undo_depth(), 1);
    ed.undo();
    assert_eq!(ed.board().viewport().pan, Vec2::ZERO);
}
