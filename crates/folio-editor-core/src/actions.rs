//! Editor actions and input types.
//!
//! Platform-agnostic definitions for editor operations. `EditorAction` is a
//! semantic operation; `InputType` is the semantic intent of an input event
//! (browser `beforeinput`, native input methods). Keyboard shortcuts map to
//! actions through `default_keybinding`.

use smol_str::SmolStr;

use crate::format::FormatKind;
use crate::style::FontSize;

/// Semantic input types from input events.
///
/// Based on the W3C Input Events `inputType` values the engine cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    /// Insert typed text.
    InsertText,
    /// Insert text from IME composition.
    InsertCompositionText,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert from paste operation.
    InsertFromPaste,
    /// Insert from drop operation.
    InsertFromDrop,
    InsertOrderedList,
    InsertUnorderedList,

    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    /// Delete by cut operation.
    DeleteByCut,

    HistoryUndo,
    HistoryRedo,

    FormatBold,
    FormatItalic,
    FormatUnderline,

    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// The action the engine runs instead of the native edit, if any.
    ///
    /// Plain insertions and deletions are left to the surface; the engine
    /// picks up the result through `content_changed`.
    pub fn to_action(&self) -> Option<EditorAction> {
        match self {
            Self::InsertParagraph => Some(EditorAction::InsertParagraph),
            Self::InsertLineBreak => Some(EditorAction::InsertLineBreak),
            Self::InsertOrderedList => Some(EditorAction::InsertNumberedList),
            Self::InsertUnorderedList => Some(EditorAction::InsertBulletList),
            Self::HistoryUndo => Some(EditorAction::Undo),
            Self::HistoryRedo => Some(EditorAction::Redo),
            Self::FormatBold => Some(EditorAction::ToggleBold),
            Self::FormatItalic => Some(EditorAction::ToggleItalic),
            Self::FormatUnderline => Some(EditorAction::ToggleUnderline),
            _ => None,
        }
    }
}

/// All editor actions.
///
/// These represent semantic operations on the document, decoupled from how
/// they're triggered (keyboard, toolbar button, input event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    // === Text Insertion ===
    /// Insert text at the selection, carrying the typing style.
    Insert { text: String },
    /// Insert a soft line break (Shift+Enter). Never continues a list.
    InsertLineBreak,
    /// Enter: list continuation, list exit or a line break.
    InsertParagraph,

    // === Deletion ===
    /// Backspace. Only handled when it strips a list marker.
    DeleteBackward,

    // === History ===
    Undo,
    Redo,

    // === Formatting ===
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetColor(String),
    SetFontSize(FontSize),
    SetFontFamily(String),

    // === Lists ===
    InsertBulletList,
    InsertNumberedList,
    Indent,
    Outdent,

    // === Selection ===
    SelectAll,
}

impl EditorAction {
    /// The formatting command behind a formatting action.
    pub fn format_kind(&self) -> Option<FormatKind> {
        match self {
            Self::ToggleBold => Some(FormatKind::Bold),
            Self::ToggleItalic => Some(FormatKind::Italic),
            Self::ToggleUnderline => Some(FormatKind::Underline),
            Self::SetColor(color) => Some(FormatKind::Color(color.clone())),
            Self::SetFontSize(size) => Some(FormatKind::FontSize(*size)),
            Self::SetFontFamily(family) => Some(FormatKind::FontFamily(family.clone())),
            _ => None,
        }
    }
}

/// A key as the engine sees it.
///
/// Hosts translate their native key events into this; anything the
/// keybinding table has no use for becomes `Unidentified` or a
/// `Character`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, as produced with the current modifiers.
    Character(SmolStr),
    Unidentified,

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // Bare modifier presses.
    Alt,
    Control,
    Meta,
    Shift,

    // Dedicated hardware/media keys.
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Caret movement keys; the surface moves the caret itself.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl, or Cmd when `cmd` is set.
    pub const fn primary(cmd: bool) -> Self {
        Self {
            ctrl: !cmd,
            meta: cmd,
            ..Self::NONE
        }
    }

    pub const fn with_shift(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }

    /// Ctrl or Cmd held, whichever the platform uses.
    pub fn has_primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key plus the modifiers held with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::NONE)
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn shift(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::SHIFT)
    }

    /// Ctrl+key, or Cmd+key when `cmd` is set.
    pub fn primary(key: Key, cmd: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(cmd))
    }

    pub fn primary_shift(key: Key, cmd: bool) -> Self {
        Self::with_modifiers(key, Modifiers::primary(cmd).with_shift())
    }
}

/// What the host should do with the key event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// The editor acted on it; suppress the native behavior.
    Handled,
    /// No binding, or the binding declined (Tab off a list line).
    NotHandled,
    /// Caret movement the surface performs natively.
    PassThrough,
}

/// Built-in shortcut table.
///
/// Ctrl and Cmd are interchangeable so the same table serves every
/// platform.
pub fn default_keybinding(combo: &KeyCombo) -> Option<EditorAction> {
    let mods = combo.modifiers;
    match &combo.key {
        Key::Character(c) if mods.has_primary() && !mods.alt => {
            match c.to_lowercase().as_str() {
                "z" if mods.shift => Some(EditorAction::Redo),
                "z" => Some(EditorAction::Undo),
                "y" => Some(EditorAction::Redo),
                "b" => Some(EditorAction::ToggleBold),
                "i" => Some(EditorAction::ToggleItalic),
                "u" => Some(EditorAction::ToggleUnderline),
                "a" => Some(EditorAction::SelectAll),
                _ => None,
            }
        }
        Key::Undo => Some(EditorAction::Undo),
        Key::Redo => Some(EditorAction::Redo),
        Key::Tab if !mods.has_primary() && !mods.alt => Some(if mods.shift {
            EditorAction::Outdent
        } else {
            EditorAction::Indent
        }),
        Key::Enter if !mods.has_primary() && !mods.alt => Some(if mods.shift {
            EditorAction::InsertLineBreak
        } else {
            EditorAction::InsertParagraph
        }),
        Key::Backspace if mods == Modifiers::NONE || mods == Modifiers::SHIFT => {
            Some(EditorAction::DeleteBackward)
        }
        _ => None,
    }
}
