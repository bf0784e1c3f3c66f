//! WASM bridge for Corkboard. Exposes the board editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>`, forwards DOM events to the `handle_*` methods, and calls
//! `render()` whenever one of them returns `true` or `tick()` asks for
//! another frame.

mod measure;
mod render2d;

use cork_core::id::ItemId;
use cork_core::model::PALETTE;
use cork_editor::{CanvasEditor, EditorConfig, InputEvent, Modifiers};
use cork_render::frame::Theme;
use measure::CanvasMeasure;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// The main WASM-facing board controller.
///
/// Owns the editor and the canvas it paints into. All interaction from the
/// page goes through this struct.
#[wasm_bindgen]
pub struct BoardCanvas {
    editor: CanvasEditor,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Canvas size in CSS pixels.
    width: f64,
    height: f64,
    dpr: f64,
    /// `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl BoardCanvas {
    /// Mount on a canvas element. Fails if the element has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<BoardCanvas, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;

        let width = f64::from(canvas.width());
        let height = f64::from(canvas.height());
        let measure = Box::new(CanvasMeasure::new(ctx.clone()));
        let mut editor = CanvasEditor::with_measure(EditorConfig::default(), measure);
        editor.set_viewport_size(width, height);
        log::info!("board mounted at {width}x{height}");

        Ok(Self {
            editor,
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            dark_mode: false,
        })
    }

    /// Resize to `width × height` CSS pixels; the backing raster is scaled by `dpr`.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.canvas.set_width((width * dpr).round() as u32);
        self.canvas.set_height((height * dpr).round() as u32);
        self.editor.set_viewport_size(width, height);
    }

    /// Paint one frame.
    pub fn render(&self) {
        let theme = if self.dark_mode { Theme::dark() } else { Theme::light() };
        let draft = self.editor.draft_connector();
        let input = render2d::FrameInput {
            theme: &theme,
            fade: self.editor.fade(),
            measure: self.editor.measure(),
            width: self.width,
            height: self.height,
            dpr: self.dpr,
            draft: draft.as_ref(),
        };
        render2d::render_board(&self.ctx, self.editor.board(), &input);
    }

    /// Advance animations. Returns `true` while another frame is needed.
    pub fn tick(&mut self) -> bool {
        self.editor.tick()
    }

    /// End the session: abandon the live gesture and stop animating.
    pub fn unmount(&mut self) {
        self.editor.unmount();
        log::info!("board unmounted");
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    // ─── Pointer & keyboard ──────────────────────────────────────────────

    /// Handle pointer down. Returns `true` if a repaint is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::from_pointer_down(x, y, mods))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::from_pointer_move(x, y, mods))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_up(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::from_pointer_up(x, y, mods))
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        self.editor.handle(&InputEvent::PointerLeave)
    }

    pub fn handle_click(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle(&InputEvent::Click {
            at: cork_core::Point::new(x, y),
        })
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle(&InputEvent::DoubleClick {
            at: cork_core::Point::new(x, y),
        })
    }

    /// Wheel zoom about the pointer. `delta_y` is `WheelEvent.deltaY`.
    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.editor.handle(&InputEvent::Wheel {
            at: cork_core::Point::new(x, y),
            delta_y,
        })
    }

    /// Handle a key press. Returns `true` when the key was consumed and the
    /// page should `preventDefault()`.
    pub fn handle_key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::key_down(key, mods))
    }

    pub fn handle_key_up(&mut self, key: &str) -> bool {
        self.editor.handle(&InputEvent::KeyUp { key: key.to_string() })
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Add a default card centred in the viewport. Returns its id.
    pub fn add_card_at_viewport_center(&mut self) -> String {
        self.editor.add_card_at_viewport_center().as_str().to_string()
    }

    pub fn start_connector_creation(&mut self) {
        self.editor.start_connector_creation();
    }

    pub fn cancel_connector_creation(&mut self) -> bool {
        self.editor.cancel_connector_creation()
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn duplicate_selected(&mut self) -> bool {
        self.editor.duplicate()
    }

    pub fn copy_selected(&mut self) -> bool {
        self.editor.copy()
    }

    pub fn paste(&mut self) -> bool {
        self.editor.paste()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    // ─── Status ──────────────────────────────────────────────────────────

    /// Toolbar status as JSON:
    /// `{"canUndo","canRedo","connectorMode","interaction","cursor","selection","zoom"}`.
    pub fn get_status(&self) -> String {
        let board = self.editor.board();
        serde_json::json!({
            "canUndo": self.editor.can_undo(),
            "canRedo": self.editor.can_redo(),
            "connectorMode": self.editor.is_connector_mode(),
            "interaction": self.editor.interaction().name(),
            "cursor": self.editor.cursor(),
            "selection": board.selection(),
            "zoom": board.viewport().scale,
        })
        .to_string()
    }

    pub fn get_cursor(&self) -> String {
        self.editor.cursor().to_string()
    }

    // ─── Text editing & color toolbar ────────────────────────────────────

    /// Text of the card being edited, or an empty string.
    pub fn get_editing_text(&self) -> String {
        self.editor.editing_text().unwrap_or_default().to_string()
    }

    /// Replace the edited card's text (from the inline `<textarea>`).
    pub fn set_editing_text(&mut self, text: &str) -> bool {
        self.editor.edit_text(text)
    }

    pub fn end_editing(&mut self) -> bool {
        self.editor.end_editing()
    }

    /// Inline editor placement as JSON, or `null` when not editing.
    pub fn get_editing_overlay(&self) -> String {
        match self.editor.editing_overlay() {
            Some(o) => serde_json::json!({
                "left": o.left,
                "top": o.top,
                "width": o.width,
                "height": o.height,
                "fontSize": o.font_size,
                "lineHeight": o.line_height,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// Color toolbar anchor `{"x","y"}` in CSS pixels, or `null`.
    pub fn get_toolbar_anchor(&self) -> String {
        match self.editor.toolbar_anchor() {
            Some(p) => serde_json::json!({ "x": p.x, "y": p.y }).to_string(),
            None => "null".to_string(),
        }
    }

    /// The card color palette as a JSON array.
    pub fn get_palette_json(&self) -> String {
        serde_json::to_string(&PALETTE).unwrap_or_else(|_| "[]".to_string())
    }

    /// Apply a palette entry (`"sky"`, `"mint"`, ...) to a card.
    pub fn set_card_color(&mut self, card_id: &str, option: &str) -> bool {
        self.editor.set_card_color(ItemId::intern(card_id), option)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}
