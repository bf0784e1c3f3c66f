pub mod clipboard;
pub mod config;
pub mod editor;
pub mod gesture;
pub mod history;
pub mod input;
mod pointer;
pub mod shortcuts;

pub use config::{EditorConfig, ZoomHistory};
pub use editor::{CanvasEditor, EditingOverlay};
pub use gesture::Interaction;
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
