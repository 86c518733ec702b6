//! Browser event handling for the editor.
//!
//! Provides browser-specific event extraction and input type parsing, plus
//! `EditorBinding`, which wires the handlers to a contenteditable element.
//! Native typing and deletion stay with the browser; the `input` event
//! feeds the result back through `content_changed`. Engine commands
//! (lists, formatting, history, paste) cancel the native event.

use std::cell::RefCell;
use std::rc::Rc;

use folio_editor_core::{
    Editor, InputType, Key, KeyCombo, KeydownResult, Modifiers, PastePayload, SurfaceAdapter,
};
use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;

use crate::dom_surface::DomSurface;
use crate::timer::HistoryTimer;

// === InputType browser parsing ===

/// Parse a browser inputType string to an InputType enum.
///
/// This handles the W3C Input Events inputType values as returned by
/// `InputEvent.inputType` in browsers.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        // Insertion
        "insertText" => InputType::InsertText,
        "insertCompositionText" => InputType::InsertCompositionText,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertFromDrop" => InputType::InsertFromDrop,
        "insertOrderedList" => InputType::InsertOrderedList,
        "insertUnorderedList" => InputType::InsertUnorderedList,

        // Deletion
        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteByCut" => InputType::DeleteByCut,

        // History
        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        // Formatting
        "formatBold" => InputType::FormatBold,
        "formatItalic" => InputType::FormatItalic,
        "formatUnderline" => InputType::FormatUnderline,

        // Unknown
        other => InputType::Unknown(other.to_string()),
    }
}

/// Parse a `KeyboardEvent.key` value to the editor's Key enum.
pub fn parse_browser_key(key: &str) -> Key {
    match key {
        "Enter" => Key::Enter,
        "Backspace" => Key::Backspace,
        "Delete" => Key::Delete,
        "Tab" => Key::Tab,
        "Escape" => Key::Escape,
        "ArrowLeft" => Key::ArrowLeft,
        "ArrowRight" => Key::ArrowRight,
        "ArrowUp" => Key::ArrowUp,
        "ArrowDown" => Key::ArrowDown,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Alt" => Key::Alt,
        "Control" => Key::Control,
        "Meta" => Key::Meta,
        "Shift" => Key::Shift,
        "Copy" => Key::Copy,
        "Cut" => Key::Cut,
        "Paste" => Key::Paste,
        "Undo" => Key::Undo,
        "Redo" => Key::Redo,
        s if s.chars().count() == 1 => Key::character(s),
        _ => Key::Unidentified,
    }
}

/// Key and modifier state of a keydown event.
pub fn key_combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    let modifiers = Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    };
    KeyCombo::with_modifiers(parse_browser_key(&event.key()), modifiers)
}

/// Read the `text/html` and `text/plain` flavors of a paste event.
pub fn paste_payload_from_event(event: &web_sys::ClipboardEvent) -> PastePayload {
    let Some(data_transfer) = event.clipboard_data() else {
        return PastePayload::default();
    };
    let flavor = |mime: &str| {
        data_transfer
            .get_data(mime)
            .ok()
            .filter(|data| !data.is_empty())
    };
    PastePayload {
        html: flavor("text/html"),
        plain: flavor("text/plain"),
    }
}

// === Handlers ===

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Event was handled, prevent default browser behavior.
    Handled,
    /// Event should be handled by browser (plain typing, composition).
    PassThrough,
}

/// Handle a keydown event through the default keybindings.
///
/// Prevents the browser default when the editor handled the key.
pub fn handle_keydown<S: SurfaceAdapter>(
    editor: &mut Editor<S>,
    event: &web_sys::KeyboardEvent,
) -> KeydownResult {
    // Let IME composition own its keys.
    if event.is_composing() {
        return KeydownResult::PassThrough;
    }

    let combo = key_combo_from_event(event);
    if combo.key.is_modifier() {
        return KeydownResult::PassThrough;
    }

    let result = editor.handle_key(&combo);
    tracing::trace!(target: "folio::editor", ?combo, ?result, "keydown");
    if result == KeydownResult::Handled {
        event.prevent_default();
    }
    result
}

/// Handle a beforeinput event.
///
/// Typed text goes through the engine only while a toolbar typing style is
/// waiting; otherwise the browser inserts it natively. Input types with an
/// engine action (history, lists, formatting, Enter) are cancelled and run
/// by the engine.
pub fn handle_beforeinput<S: SurfaceAdapter>(
    editor: &mut Editor<S>,
    event: &web_sys::InputEvent,
) -> BeforeInputResult {
    let input_type = parse_browser_input_type(&event.input_type());
    tracing::debug!(target: "folio::editor", ?input_type, "beforeinput");

    if event.is_composing() {
        return BeforeInputResult::PassThrough;
    }

    let result = match &input_type {
        InputType::InsertText if editor.has_typing_style() => match event.data() {
            Some(data) if !data.is_empty() => {
                editor.insert_text(&data);
                BeforeInputResult::Handled
            }
            _ => BeforeInputResult::PassThrough,
        },
        other => match other.to_action() {
            Some(action) => match editor.execute(&action) {
                KeydownResult::Handled => BeforeInputResult::Handled,
                KeydownResult::NotHandled | KeydownResult::PassThrough => {
                    BeforeInputResult::PassThrough
                }
            },
            None => BeforeInputResult::PassThrough,
        },
    };

    if result == BeforeInputResult::Handled {
        event.prevent_default();
    }
    result
}

/// Handle an input event: the browser changed the content natively.
pub fn handle_input<S: SurfaceAdapter>(editor: &mut Editor<S>) {
    editor.content_changed();
}

/// Handle a paste event.
///
/// The native paste is always cancelled. The sanitized text, if any, is
/// inserted by the engine.
pub fn handle_paste<S: SurfaceAdapter>(
    editor: &mut Editor<S>,
    event: &web_sys::ClipboardEvent,
) -> bool {
    event.prevent_default();
    let payload = paste_payload_from_event(event);
    editor.paste(&payload)
}

/// Handle a document selectionchange event.
pub fn handle_selectionchange<S: SurfaceAdapter>(editor: &mut Editor<S>) {
    editor.capture_selection();
}

// === Binding ===

/// Editor shared between the binding's listeners and the host.
pub type SharedEditor = Rc<RefCell<Editor<DomSurface>>>;

/// Event listeners attached to one editor element.
///
/// Listeners are removed when the binding is dropped. Events arriving while
/// the editor is already borrowed (re-entrant DOM events fired by an engine
/// write) are ignored.
pub struct EditorBinding {
    editor: SharedEditor,
    timer: Rc<HistoryTimer>,
    _listeners: Vec<EventListener>,
}

impl EditorBinding {
    /// Attach listeners to the editor's element and the document.
    ///
    /// Returns `None` when the element cannot be found.
    pub fn attach(editor: SharedEditor) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let element = {
            let editor_id = editor.borrow().surface().editor_id().to_string();
            document.get_element_by_id(&editor_id)?
        };

        let timer = Rc::new(HistoryTimer::new(editor.clone()));
        let active = EventListenerOptions::enable_prevent_default();
        let mut listeners = Vec::new();

        {
            let editor = editor.clone();
            let timer = timer.clone();
            listeners.push(EventListener::new_with_options(
                &element,
                "keydown",
                active,
                move |event| {
                    let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                        return;
                    };
                    if let Ok(mut editor) = editor.try_borrow_mut() {
                        handle_keydown(&mut *editor, event);
                    }
                    timer.reschedule();
                },
            ));
        }
        {
            let editor = editor.clone();
            let timer = timer.clone();
            listeners.push(EventListener::new_with_options(
                &element,
                "beforeinput",
                active,
                move |event| {
                    let Some(event) = event.dyn_ref::<web_sys::InputEvent>() else {
                        return;
                    };
                    if let Ok(mut editor) = editor.try_borrow_mut() {
                        handle_beforeinput(&mut *editor, event);
                    }
                    timer.reschedule();
                },
            ));
        }
        {
            let editor = editor.clone();
            let timer = timer.clone();
            listeners.push(EventListener::new(&element, "input", move |_| {
                if let Ok(mut editor) = editor.try_borrow_mut() {
                    handle_input(&mut *editor);
                }
                timer.reschedule();
            }));
        }
        {
            let editor = editor.clone();
            let timer = timer.clone();
            listeners.push(EventListener::new_with_options(
                &element,
                "paste",
                active,
                move |event| {
                    let Some(event) = event.dyn_ref::<web_sys::ClipboardEvent>() else {
                        return;
                    };
                    if let Ok(mut editor) = editor.try_borrow_mut() {
                        handle_paste(&mut *editor, event);
                    }
                    timer.reschedule();
                },
            ));
        }
        {
            let editor = editor.clone();
            listeners.push(EventListener::new(&document, "selectionchange", move |_| {
                if let Ok(mut editor) = editor.try_borrow_mut() {
                    handle_selectionchange(&mut *editor);
                }
            }));
        }

        tracing::debug!(target: "folio::editor", listeners = listeners.len(), "editor attached");
        Some(Self {
            editor,
            timer,
            _listeners: listeners,
        })
    }

    pub fn editor(&self) -> &SharedEditor {
        &self.editor
    }

    /// Re-arm the history timer after a host-driven change (toolbar
    /// commands run outside the bound events).
    pub fn sync_timer(&self) {
        self.timer.reschedule();
    }
}
