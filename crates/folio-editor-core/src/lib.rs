//! folio-editor-core: rich-text editing engine without platform dependencies.
//!
//! This crate provides:
//! - `StyledRun` / `Style` - the styled-run document model
//! - `SurfaceAdapter` - the seam to a host's editable surface, plus
//!   `MemorySurface` for tests and headless hosts
//! - Offset mapping and selection tracking between flat offsets and the
//!   surface tree
//! - Formatting, list authoring, snapshot history and paste cleanup
//! - `Editor<S>` - the state machine tying them to one surface

pub mod actions;
pub mod config;
pub mod editor;
pub mod format;
pub mod history;
pub mod list;
pub mod offset_map;
pub mod paste;
pub mod runs;
pub mod selection;
pub mod style;
pub mod surface;
pub mod text;

pub use actions::{EditorAction, InputType, Key, KeyCombo, KeydownResult, Modifiers, default_keybinding};
pub use config::{EditorConfig, EditorProps};
pub use editor::{ChangeCallback, Editor, EditorState};
pub use format::FormatKind;
pub use history::{History, HistoryItem, UndoManager};
pub use list::{ListKind, ListLineState, ListState};
pub use offset_map::{to_flat_offset, to_node_position};
pub use paste::PastePayload;
pub use runs::StyledRun;
pub use selection::{Selection, SelectionDirection};
pub use smol_str::SmolStr;
pub use style::{FontSize, Formatting, Style};
pub use surface::{
    MemorySurface, NodePath, NodePosition, RawSelection, SurfaceAdapter, SurfaceError, SurfaceNode,
};
pub use text::PlainText;
