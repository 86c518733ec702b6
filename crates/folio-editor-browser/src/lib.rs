//! Browser DOM layer for the folio rich-text editor.
//!
//! This crate binds `folio-editor-core` to a contenteditable element. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom_surface`: `SurfaceAdapter` over a contenteditable element
//! - `events`: keydown, beforeinput, input, paste and selectionchange handlers
//! - `timer`: drives the history debounce from a browser timeout
//!
//! # Re-exports
//!
//! This crate re-exports `folio-editor-core` for convenience, so consumers
//! only need to depend on `folio-editor-browser`.

// Re-export core crate
pub use folio_editor_core;
pub use folio_editor_core::*;

pub mod dom_surface;
pub mod events;
pub mod timer;

pub use dom_surface::DomSurface;
pub use events::{
    BeforeInputResult, EditorBinding, SharedEditor, handle_beforeinput, handle_input,
    handle_keydown, handle_paste, handle_selectionchange, key_combo_from_event,
    parse_browser_input_type, parse_browser_key, paste_payload_from_event,
};
pub use timer::HistoryTimer;
