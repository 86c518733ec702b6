//! The editor: one surface, one state, one change pipeline.
//!
//! Every mutation, whether native typing picked up through
//! `content_changed` or an engine command, ends in the same place: the
//! surface is snapshotted, runs and plain text are re-extracted, a history
//! snapshot is scheduled and `on_change` is called.

use web_time::Instant;

use crate::actions::{EditorAction, KeyCombo, KeydownResult, default_keybinding};
use crate::config::{EditorConfig, EditorProps};
use crate::format::{self, FormatKind};
use crate::history::{History, HistoryItem, UndoManager};
use crate::list::{self, ListEdit, ListKind, ListLineState, Splice};
use crate::paste::{self, PastePayload};
use crate::runs::{self, StyledRun};
use crate::selection::{Selection, SelectionDirection};
use crate::style::{Formatting, Style};
use crate::surface::SurfaceAdapter;
use crate::text::{self, PlainText};

/// Host callback receiving the plain text and runs after every mutation.
pub type ChangeCallback = Box<dyn FnMut(&str, &[StyledRun])>;

/// Style chosen from the toolbar with a collapsed caret.
///
/// Applies to text inserted at `caret` until the caret moves elsewhere.
/// `style: None` means "insert unstyled" and still overrides the
/// surrounding style.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypingStyle {
    style: Option<Style>,
    caret: usize,
}

/// Everything the editor knows about its document.
#[derive(Debug, Clone)]
pub struct EditorState {
    history: History,
    runs: Vec<StyledRun>,
    plain_text: String,
    selection: Option<Selection>,
    typing_style: Option<TypingStyle>,
    restoring: bool,
}

impl EditorState {
    fn new(runs: Vec<StyledRun>, config: &EditorConfig) -> Self {
        let plain_text = runs::plain_text(&runs);
        let mut history = History::new(config.history_limit, config.debounce());
        history.reset(HistoryItem::new(plain_text.clone(), runs.clone(), None));
        Self {
            history,
            runs,
            plain_text,
            selection: None,
            typing_style: None,
            restoring: false,
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn text_len(&self) -> usize {
        self.plain_text.chars().count()
    }

    /// Selection to act on: the captured one, or a caret at the end.
    fn selection_or_end(&self) -> Selection {
        self.selection
            .map(|sel| sel.clamped(self.text_len()))
            .unwrap_or_else(|| Selection::caret(self.text_len()))
    }

    /// Style for text inserted over `selection`.
    fn insertion_style(&self, selection: &Selection) -> Option<Style> {
        match &self.typing_style {
            Some(typing) if selection.is_collapsed() && typing.caret == selection.start => {
                typing.style.clone()
            }
            _ => runs::style_at(&self.runs, selection.start).cloned(),
        }
    }

    /// Forget the typing style once the caret has left its anchor.
    fn drop_stale_typing_style(&mut self) {
        let keep = match (&self.typing_style, self.selection) {
            (Some(typing), Some(sel)) => sel.is_collapsed() && sel.start == typing.caret,
            _ => false,
        };
        if !keep {
            self.typing_style = None;
        }
    }
}

/// A rich-text editor bound to one surface.
pub struct Editor<S: SurfaceAdapter> {
    surface: S,
    state: EditorState,
    config: EditorConfig,
    on_change: Option<ChangeCallback>,
}

impl<S: SurfaceAdapter> Editor<S> {
    /// Render the props' initial content into `surface` and seed history.
    pub fn new(surface: S, props: &EditorProps, config: EditorConfig) -> Self {
        let runs = props.initial_runs();
        let mut editor = Self {
            surface,
            state: EditorState::new(runs, &config),
            config,
            on_change: None,
        };
        if let Err(e) = editor.surface.replace_runs(&editor.state.runs) {
            tracing::warn!(target: "folio::editor", error = %e, "initial render failed");
        }
        editor
    }

    /// Replace the document with new props, dropping all history.
    pub fn reset(&mut self, props: &EditorProps) {
        self.state = EditorState::new(props.initial_runs(), &self.config);
        if let Err(e) = self.surface.replace_runs(&self.state.runs) {
            tracing::warn!(target: "folio::editor", error = %e, "reset render failed");
        }
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&str, &[StyledRun]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.state.runs
    }

    pub fn plain_text(&self) -> &str {
        &self.state.plain_text
    }

    pub fn selection(&self) -> Option<Selection> {
        self.state.selection
    }

    // === Change pipeline ===

    /// The surface content changed (native typing, or an engine rewrite).
    pub fn content_changed(&mut self) {
        self.content_changed_at(Instant::now());
    }

    /// `content_changed` with an explicit clock, for hosts that batch
    /// events and for tests.
    pub fn content_changed_at(&mut self, now: Instant) {
        if !self.sync_from_surface() {
            return;
        }
        if !self.state.restoring {
            let item = HistoryItem::at(
                self.state.plain_text.clone(),
                self.state.runs.clone(),
                self.state.selection,
                now,
            );
            self.state.history.schedule(item, now);
        }
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.state.plain_text, &self.state.runs);
        }
    }

    /// Re-read the native selection (the host's `selectionchange`).
    pub fn capture_selection(&mut self) {
        self.state.selection = self.surface.selection_offsets();
        self.state.drop_stale_typing_style();
    }

    /// Commit a pending history snapshot whose debounce window has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.state.history.tick(now)
    }

    /// Deadline the host timer should fire at, if a snapshot is pending.
    pub fn next_tick(&self) -> Option<Instant> {
        self.state.history.pending_due()
    }

    fn sync_from_surface(&mut self) -> bool {
        let root = match self.surface.snapshot() {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(target: "folio::editor", error = %e, "snapshot failed");
                return false;
            }
        };
        self.state.runs = runs::extract(&root);
        self.state.plain_text = root.plain_text();
        self.state.selection = crate::selection::capture(&root, self.surface.raw_selection().as_ref());
        self.state.drop_stale_typing_style();
        true
    }

    /// Render `runs`, place `selection` and run the change pipeline.
    fn write_runs(&mut self, runs: Vec<StyledRun>, selection: Selection) {
        if let Err(e) = self.surface.replace_runs(&runs) {
            tracing::warn!(target: "folio::editor", error = %e, "render failed");
            return;
        }
        if !self.surface.set_selection_offsets(&selection) {
            tracing::debug!(target: "folio::editor", ?selection, "selection not restored");
        }
        self.content_changed();
    }

    fn apply_splices(&mut self, splices: &[Splice], selection: Selection) {
        let mut runs = self.state.runs.clone();
        for splice in splices.iter().rev() {
            let style = runs::style_at(&runs, splice.range.start).cloned();
            runs = runs::replace_range(&runs, splice.range.clone(), &splice.text, style);
        }
        self.write_runs(runs, selection);
    }

    fn apply_list_edit(&mut self, edit: ListEdit) {
        if edit.is_noop() {
            self.state.selection = Some(edit.selection);
            return;
        }
        self.apply_splices(&edit.splices, edit.selection);
    }

    // === History ===

    /// Step back one snapshot. Returns false at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        self.remember_caret();
        let Some(item) = self.state.history.undo().cloned() else {
            return false;
        };
        self.restore(item);
        true
    }

    /// Step forward one snapshot. Returns false at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        self.remember_caret();
        let Some(item) = self.state.history.redo().cloned() else {
            return false;
        };
        self.restore(item);
        true
    }

    /// Keep the caret the user left so stepping back here restores it.
    fn remember_caret(&mut self) {
        self.capture_selection();
        if let Some(selection) = self.state.selection {
            self.state.history.record_selection(selection);
        }
    }

    fn restore(&mut self, item: HistoryItem) {
        self.state.restoring = true;
        match self.surface.replace_runs(&item.runs) {
            Ok(()) => {
                if let Some(selection) = item.selection {
                    self.surface.set_selection_offsets(&selection);
                }
                self.content_changed();
            }
            Err(e) => tracing::warn!(target: "folio::editor", error = %e, "history restore failed"),
        }
        self.state.typing_style = None;
        self.state.restoring = false;
    }

    // === Formatting ===

    /// Apply a formatting command to the selection.
    ///
    /// With a collapsed caret nothing is rewritten; the command updates the
    /// typing style used by the next `insert_text` at that caret.
    pub fn apply_formatting(&mut self, kind: FormatKind) {
        self.capture_selection();
        let selection = self.state.selection_or_end();
        if selection.is_collapsed() {
            let current = self.state.insertion_style(&selection);
            self.state.typing_style = Some(TypingStyle {
                style: format::update_typing_style(current.as_ref(), &kind),
                caret: selection.start,
            });
            self.state.selection = Some(selection);
            return;
        }
        let runs = format::apply_formatting(&self.state.runs, selection.to_range(), &kind);
        self.write_runs(runs, selection);
    }

    /// Formatting at the caret (the selection start), for toolbar state.
    pub fn current_formatting(&self) -> Formatting {
        let defaults = &self.config.default_formatting;
        let caret = self.state.selection_or_end().start;
        if let Some(typing) = &self.state.typing_style {
            if typing.caret == caret {
                return Formatting::resolve(typing.style.as_ref(), defaults);
            }
        }
        match self.surface.snapshot() {
            Ok(root) => format::current_formatting_at(&root, caret, defaults),
            Err(_) => defaults.clone(),
        }
    }

    /// Whether a toolbar style is waiting for the next insertion.
    pub fn has_typing_style(&self) -> bool {
        self.state.typing_style.is_some()
    }

    /// Insert text over the selection, carrying the typing style.
    pub fn insert_text(&mut self, text: &str) {
        self.capture_selection();
        let selection = self.state.selection_or_end();
        let style = self.state.insertion_style(&selection);
        let typing = self.state.typing_style.take();

        let runs = runs::replace_range(&self.state.runs, selection.to_range(), text, style);
        let caret = selection.start + text.chars().count();
        self.write_runs(runs, Selection::caret(caret));

        // Keep typing in the chosen style.
        if let Some(mut typing) = typing {
            typing.caret = caret;
            self.state.typing_style = Some(typing);
        }
    }

    // === Lists ===

    /// Turn the caret line or the selected lines into a list.
    pub fn insert_list(&mut self, kind: ListKind) {
        self.capture_selection();
        let selection = self.state.selection_or_end();
        let edit = list::create_list(&self.state.plain_text, selection, kind);
        self.apply_list_edit(edit);
    }

    /// Enter key. Returns false when there is no selection to act on.
    pub fn handle_enter(&mut self) -> bool {
        self.capture_selection();
        let Some(selection) = self.state.selection else {
            return false;
        };
        let edit = list::on_enter(&self.state.plain_text, selection);
        self.apply_list_edit(edit);
        true
    }

    /// Shift+Enter: a line break that never continues a list.
    pub fn handle_line_break(&mut self) -> bool {
        self.capture_selection();
        let Some(selection) = self.state.selection else {
            return false;
        };
        let caret = selection.start + 1;
        self.apply_splices(&[Splice::new(selection.to_range(), "\n")], Selection::caret(caret));
        true
    }

    /// Backspace. Returns false when the host's default delete should run.
    pub fn handle_backspace(&mut self) -> bool {
        self.capture_selection();
        let Some(selection) = self.state.selection else {
            return false;
        };
        match list::on_backspace(&self.state.plain_text, selection) {
            Some(edit) => {
                self.apply_list_edit(edit);
                true
            }
            None => false,
        }
    }

    /// Tab. Returns false on a non-list line.
    pub fn indent(&mut self) -> bool {
        self.change_list_level(false)
    }

    /// Shift+Tab. Returns false on a non-list line.
    pub fn outdent(&mut self) -> bool {
        self.change_list_level(true)
    }

    fn change_list_level(&mut self, outdent: bool) -> bool {
        self.capture_selection();
        let Some(selection) = self.state.selection else {
            return false;
        };
        match list::on_tab(&self.state.plain_text, selection, outdent) {
            Some(edit) => {
                self.apply_list_edit(edit);
                true
            }
            None => false,
        }
    }

    /// List state of the caret line.
    pub fn list_state(&self) -> ListLineState {
        list::line_state_at(&self.state.plain_text, self.state.selection_or_end().focus())
    }

    // === Clipboard ===

    /// Insert a sanitized paste over the selection.
    ///
    /// Returns false (and changes nothing) when the payload has no text.
    pub fn paste(&mut self, payload: &PastePayload) -> bool {
        let Some(text) = paste::sanitize(payload) else {
            tracing::debug!(target: "folio::editor", "empty paste ignored");
            return false;
        };
        self.insert_text(&text);
        true
    }

    // === Selection ===

    pub fn select_all(&mut self) {
        let len = self.state.text_len();
        self.set_selection(Selection::new(0, len, SelectionDirection::Forward));
    }

    /// Select the word around a flat offset.
    pub fn select_word_at(&mut self, offset: usize) {
        let range = text::word_range_at(&PlainText::new(&self.state.plain_text), offset);
        self.set_selection(Selection::new(range.start, range.end, SelectionDirection::Forward));
    }

    /// Select the paragraph (line) around a flat offset.
    pub fn select_paragraph_at(&mut self, offset: usize) {
        let range = text::paragraph_range_at(&PlainText::new(&self.state.plain_text), offset);
        self.set_selection(Selection::new(range.start, range.end, SelectionDirection::Forward));
    }

    /// Install a selection on the surface and remember it.
    pub fn set_selection(&mut self, selection: Selection) {
        let selection = selection.clamped(self.state.text_len());
        self.surface.set_selection_offsets(&selection);
        self.state.selection = Some(selection);
        self.state.drop_stale_typing_style();
    }

    // === Dispatch ===

    /// Run an action. The result tells the host whether to suppress its own
    /// handling of the triggering event.
    pub fn execute(&mut self, action: &EditorAction) -> KeydownResult {
        if let Some(kind) = action.format_kind() {
            self.apply_formatting(kind);
            return KeydownResult::Handled;
        }
        let handled = match action {
            EditorAction::Undo => {
                self.undo();
                true
            }
            EditorAction::Redo => {
                self.redo();
                true
            }
            EditorAction::Insert { text } => {
                self.insert_text(text);
                true
            }
            EditorAction::InsertParagraph => self.handle_enter(),
            EditorAction::InsertLineBreak => self.handle_line_break(),
            EditorAction::DeleteBackward => self.handle_backspace(),
            EditorAction::InsertBulletList => {
                self.insert_list(ListKind::Bullet);
                true
            }
            EditorAction::InsertNumberedList => {
                self.insert_list(ListKind::Number);
                true
            }
            EditorAction::Indent => self.indent(),
            EditorAction::Outdent => self.outdent(),
            EditorAction::SelectAll => {
                self.select_all();
                true
            }
            EditorAction::ToggleBold
            | EditorAction::ToggleItalic
            | EditorAction::ToggleUnderline
            | EditorAction::SetColor(_)
            | EditorAction::SetFontSize(_)
            | EditorAction::SetFontFamily(_) => true,
        };
        if handled {
            KeydownResult::Handled
        } else {
            KeydownResult::NotHandled
        }
    }

    /// Handle a keydown through the default keybindings.
    pub fn handle_key(&mut self, combo: &KeyCombo) -> KeydownResult {
        match default_keybinding(combo) {
            Some(action) => self.execute(&action),
            None if combo.key.is_navigation() => KeydownResult::PassThrough,
            None => KeydownResult::NotHandled,
        }
    }
}

impl<S: SurfaceAdapter> UndoManager for Editor<S> {
    fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    fn undo(&mut self) -> bool {
        Editor::undo(self)
    }

    fn redo(&mut self) -> bool {
        Editor::redo(self)
    }

    fn clear_history(&mut self) {
        let item = HistoryItem::new(
            self.state.plain_text.clone(),
            self.state.runs.clone(),
            self.state.selection,
        );
        self.state.history.reset(item);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::actions::Key;
    use crate::style::FontSize;
    use crate::surface::MemorySurface;

    fn editor_with(text: &str) -> Editor<MemorySurface> {
        Editor::new(
            MemorySurface::default(),
            &EditorProps::from_plain(text),
            EditorConfig::default(),
        )
    }

    fn recorded(editor: &mut Editor<MemorySurface>) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        editor.set_on_change(move |text, runs| {
            assert_eq!(runs::plain_text(runs), text);
            sink.borrow_mut().push(text.to_string());
        });
        log
    }

    /// Simulate native typing followed by the host's input event.
    fn type_at(editor: &mut Editor<MemorySurface>, caret: usize, text: &str, now: Instant) {
        editor.surface_mut().place_caret(caret);
        editor.surface_mut().type_text(text);
        editor.content_changed_at(now);
    }

    #[test]
    fn test_new_renders_props() {
        let props = EditorProps {
            plain_text: "hi there".into(),
            runs: Some(vec![
                StyledRun::new("hi", Some(Style::bold())),
                StyledRun::plain(" there"),
            ]),
            ..Default::default()
        };
        let editor = Editor::new(MemorySurface::default(), &props, EditorConfig::default());
        assert_eq!(editor.surface().get_text(), "hi there");
        assert_eq!(editor.runs(), props.runs.as_deref().unwrap());
        assert_eq!(editor.state().history().len(), 1);
    }

    #[test]
    fn test_content_changed_reports_and_schedules() {
        let mut editor = editor_with("hello");
        let log = recorded(&mut editor);
        let t0 = Instant::now();

        type_at(&mut editor, 5, "!", t0);
        assert_eq!(log.borrow().as_slice(), ["hello!"]);
        assert_eq!(editor.plain_text(), "hello!");
        assert_eq!(editor.selection(), Some(Selection::caret(6)));
        assert!(editor.state().history().is_pending());
        assert_eq!(editor.next_tick(), Some(t0 + Duration::from_millis(300)));

        assert!(!editor.tick(t0 + Duration::from_millis(299)));
        assert!(editor.tick(t0 + Duration::from_millis(300)));
        assert_eq!(editor.state().history().len(), 2);
    }

    #[test]
    fn test_undo_redo_restores_content_and_selection() {
        let mut editor = editor_with("hello");
        let t0 = Instant::now();
        type_at(&mut editor, 5, " world", t0);
        editor.tick(t0 + Duration::from_secs(1));
        type_at(&mut editor, 0, ">", t0 + Duration::from_secs(2));

        let log = recorded(&mut editor);
        assert!(editor.undo());
        assert_eq!(editor.plain_text(), "hello world");
        assert_eq!(editor.selection(), Some(Selection::caret(11)));
        assert_eq!(log.borrow().last().map(String::as_str), Some("hello world"));

        assert!(editor.undo());
        assert_eq!(editor.plain_text(), "hello");
        assert!(!editor.undo());
        assert!(!editor.can_undo());

        assert!(editor.redo());
        assert!(editor.redo());
        assert_eq!(editor.plain_text(), ">hello world");
        assert_eq!(editor.selection(), Some(Selection::caret(1)));
        assert!(!editor.redo());
        // Restoring never lands in history.
        assert!(!editor.state().history().is_pending());
        assert_eq!(editor.state().history().len(), 3);
    }

    #[test]
    fn test_redo_returns_to_moved_caret() {
        let mut editor = editor_with("hello");
        let t0 = Instant::now();
        type_at(&mut editor, 5, "!", t0);
        editor.tick(t0 + Duration::from_secs(1));

        editor.surface_mut().place_caret(2);
        editor.capture_selection();
        assert!(editor.undo());
        assert_eq!(editor.plain_text(), "hello");
        assert!(editor.redo());
        assert_eq!(editor.plain_text(), "hello!");
        assert_eq!(editor.selection(), Some(Selection::caret(2)));
    }

    #[test]
    fn test_undo_without_surface_selection_keeps_caret() {
        let mut editor = editor_with("hello");
        let t0 = Instant::now();
        type_at(&mut editor, 5, "!", t0);
        editor.tick(t0 + Duration::from_secs(1));

        editor.surface_mut().clear_selection();
        assert!(editor.undo());
        assert!(editor.redo());
        assert_eq!(editor.plain_text(), "hello!");
        assert_eq!(editor.selection(), Some(Selection::caret(6)));
    }

    #[test]
    fn test_edit_after_undo_drops_redo() {
        let mut editor = editor_with("a");
        let t0 = Instant::now();
        type_at(&mut editor, 1, "b", t0);
        editor.undo();
        assert!(editor.can_redo());
        type_at(&mut editor, 1, "c", t0 + Duration::from_secs(1));
        editor.tick(t0 + Duration::from_secs(2));
        assert!(!editor.can_redo());
        assert!(!editor.redo());
        assert_eq!(editor.plain_text(), "ac");
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EditorConfig {
            history_limit: 3,
            ..Default::default()
        };
        let mut editor = Editor::new(MemorySurface::default(), &EditorProps::from_plain("x"), config);
        let t0 = Instant::now();
        for n in 0..6u64 {
            let at = t0 + Duration::from_secs(n);
            type_at(&mut editor, n as usize + 1, "y", at);
            editor.tick(at + Duration::from_secs(1));
        }
        assert_eq!(editor.state().history().len(), 3);
    }

    #[test]
    fn test_bold_selection_and_reselect() {
        let mut editor = editor_with("hello world");
        let log = recorded(&mut editor);
        editor.surface_mut().select(5, 10);

        assert_eq!(editor.execute(&EditorAction::ToggleBold), KeydownResult::Handled);
        assert_eq!(
            editor.runs(),
            [
                StyledRun::plain("hello"),
                StyledRun::new(" worl", Some(Style::bold())),
                StyledRun::plain("d"),
            ]
        );
        assert_eq!(editor.surface().selection_offsets().map(|s| s.to_range()), Some(5..10));
        assert_eq!(log.borrow().len(), 1);
        assert!(editor.current_formatting().bold);
    }

    #[test]
    fn test_typing_style_applies_to_insertion() {
        let mut editor = editor_with("ab");
        editor.surface_mut().place_caret(1);
        editor.apply_formatting(FormatKind::Bold);
        editor.apply_formatting(FormatKind::FontSize(FontSize::Xl));
        assert!(editor.has_typing_style());
        assert!(editor.current_formatting().bold);
        assert_eq!(editor.plain_text(), "ab");

        editor.insert_text("XY");
        let styled = Style {
            bold: Some(true),
            font_size: Some(FontSize::Xl),
            ..Default::default()
        };
        assert_eq!(
            editor.runs(),
            [
                StyledRun::plain("a"),
                StyledRun::new("XY", Some(styled)),
                StyledRun::plain("b"),
            ]
        );
        assert!(editor.has_typing_style());

        // Moving the caret drops the pending style.
        editor.set_selection(Selection::caret(0));
        assert!(!editor.has_typing_style());
        assert!(!editor.current_formatting().bold);
    }

    #[test]
    fn test_enter_continues_and_exits_lists() {
        let mut editor = editor_with("• buy milk");
        editor.surface_mut().place_caret(10);
        assert_eq!(editor.handle_key(&KeyCombo::new(Key::Enter)), KeydownResult::Handled);
        assert_eq!(editor.plain_text(), "• buy milk\n• ");
        assert_eq!(editor.selection(), Some(Selection::caret(13)));

        editor.handle_key(&KeyCombo::new(Key::Enter));
        assert_eq!(editor.plain_text(), "• buy milk\n\n");
        assert_eq!(editor.list_state(), ListLineState::default());
    }

    #[test]
    fn test_enter_continues_numbering() {
        let mut editor = editor_with("3. review");
        editor.surface_mut().place_caret(9);
        editor.handle_enter();
        assert_eq!(editor.plain_text(), "3. review\n4. ");
        assert_eq!(
            editor.list_state(),
            ListLineState {
                is_list: true,
                kind: Some(ListKind::Number),
                level: 0,
            }
        );
    }

    #[test]
    fn test_backspace_in_marker() {
        let mut editor = editor_with("• item");
        editor.surface_mut().place_caret(2);
        assert_eq!(editor.handle_key(&KeyCombo::new(Key::Backspace)), KeydownResult::Handled);
        assert_eq!(editor.plain_text(), "item");
        assert_eq!(editor.selection(), Some(Selection::caret(0)));

        editor.surface_mut().place_caret(3);
        assert_eq!(editor.handle_key(&KeyCombo::new(Key::Backspace)), KeydownResult::NotHandled);
    }

    #[test]
    fn test_tab_levels() {
        let mut editor = editor_with("1. one");
        editor.surface_mut().place_caret(6);
        assert_eq!(editor.handle_key(&KeyCombo::new(Key::Tab)), KeydownResult::Handled);
        assert_eq!(editor.plain_text(), "  1. one");
        assert_eq!(editor.list_state().level, 1);

        assert_eq!(editor.handle_key(&KeyCombo::shift(Key::Tab)), KeydownResult::Handled);
        assert_eq!(editor.plain_text(), "1. one");
        // Already at the top level: handled, unchanged.
        assert_eq!(editor.handle_key(&KeyCombo::shift(Key::Tab)), KeydownResult::Handled);
        assert_eq!(editor.plain_text(), "1. one");

        let mut plain = editor_with("plain");
        plain.surface_mut().place_caret(2);
        assert_eq!(plain.handle_key(&KeyCombo::new(Key::Tab)), KeydownResult::NotHandled);
    }

    #[test]
    fn test_insert_list_over_selection() {
        let mut editor = editor_with("alpha\nbeta");
        editor.surface_mut().select(0, 10);
        editor.execute(&EditorAction::InsertBulletList);
        assert_eq!(editor.plain_text(), "• alpha\n• beta");
        assert_eq!(editor.selection().map(|s| s.to_range()), Some(0..14));
    }

    #[test]
    fn test_paste_html_replaces_selection() {
        let mut editor = editor_with("say X now");
        let log = recorded(&mut editor);
        editor.surface_mut().select(4, 5);
        assert!(editor.paste(&PastePayload::html("<p>Hi</p><p>There</p>")));
        assert_eq!(editor.plain_text(), "say Hi\nThere now");
        assert_eq!(editor.selection(), Some(Selection::caret(12)));
        assert_eq!(log.borrow().len(), 1);

        assert!(!editor.paste(&PastePayload::default()));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_word_and_paragraph_selection() {
        let mut editor = editor_with("first line\nsecond line");
        editor.select_word_at(13);
        assert_eq!(editor.selection().map(|s| s.to_range()), Some(11..17));
        editor.select_paragraph_at(2);
        assert_eq!(editor.selection().map(|s| s.to_range()), Some(0..10));
        editor.select_all();
        assert_eq!(editor.surface().selection_offsets().map(|s| s.to_range()), Some(0..22));
    }

    #[test]
    fn test_navigation_passes_through() {
        let mut editor = editor_with("x");
        assert_eq!(editor.handle_key(&KeyCombo::new(Key::ArrowLeft)), KeydownResult::PassThrough);
        assert_eq!(
            editor.handle_key(&KeyCombo::new(Key::character("q"))),
            KeydownResult::NotHandled
        );
    }
}
