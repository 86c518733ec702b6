//! List authoring on plain-text lines.
//!
//! A line is a list item when it starts with optional indentation, a marker
//! and a space. Markers are bullet glyphs (`• ◦ ▪ ‣ - *`) or a number
//! followed by `.`. Two spaces of indentation make one nesting level.
//!
//! Detection is a pure function of one line's text; nothing is cached
//! between events. Edits are returned as splices over the plain text plus
//! the selection to install afterwards, so the caller can apply them to its
//! styled runs.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::selection::{Selection, SelectionDirection};
use crate::text::PlainText;

/// Deepest nesting level.
pub const MAX_LIST_LEVEL: usize = 5;

/// Spaces of indentation per level.
pub const INDENT_WIDTH: usize = 2;

/// Marker inserted when creating a bullet list.
pub const DEFAULT_BULLET: char = '•';

pub static LIST_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent> *)(?:(?P<bullet>[•◦▪‣*-])|(?P<number>[0-9]+)\.) (?P<rest>.*)$")
        .expect("list line pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Number,
}

/// List state of the caret line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    NotList,
    Bullet(usize),
    Number(usize),
}

/// Flattened view of `ListState` for toolbar consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListLineState {
    pub is_list: bool,
    pub kind: Option<ListKind>,
    pub level: usize,
}

impl From<ListState> for ListLineState {
    fn from(state: ListState) -> Self {
        match state {
            ListState::NotList => ListLineState::default(),
            ListState::Bullet(level) => ListLineState {
                is_list: true,
                kind: Some(ListKind::Bullet),
                level,
            },
            ListState::Number(level) => ListLineState {
                is_list: true,
                kind: Some(ListKind::Number),
                level,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Bullet(char),
    Number(u64),
}

impl Marker {
    pub fn kind(&self) -> ListKind {
        match self {
            Marker::Bullet(_) => ListKind::Bullet,
            Marker::Number(_) => ListKind::Number,
        }
    }

    /// Marker for the item that follows this one.
    pub fn next(&self) -> Marker {
        match self {
            Marker::Bullet(glyph) => Marker::Bullet(*glyph),
            Marker::Number(n) => Marker::Number(n.saturating_add(1)),
        }
    }

    fn first(kind: ListKind) -> Marker {
        match kind {
            ListKind::Bullet => Marker::Bullet(DEFAULT_BULLET),
            ListKind::Number => Marker::Number(1),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Bullet(glyph) => write!(f, "{}", glyph),
            Marker::Number(n) => write!(f, "{}.", n),
        }
    }
}

/// A parsed list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    /// Leading spaces.
    pub indent: usize,
    pub marker: Marker,
    /// Chars of indentation, marker and the space after it.
    pub prefix_len: usize,
    pub content: String,
}

impl ListLine {
    pub fn level(&self) -> usize {
        (self.indent / INDENT_WIDTH).min(MAX_LIST_LEVEL)
    }

    /// Nothing but the marker (and whitespace) on the line.
    pub fn is_marker_only(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn state(&self) -> ListState {
        match self.marker.kind() {
            ListKind::Bullet => ListState::Bullet(self.level()),
            ListKind::Number => ListState::Number(self.level()),
        }
    }
}

fn prefix(indent: usize, marker: Marker) -> String {
    format!("{}{} ", " ".repeat(indent), marker)
}

/// Parse one line (without its `\n`).
pub fn parse_line(line: &str) -> Option<ListLine> {
    let caps = LIST_LINE_RE.captures(line)?;
    let indent = caps.name("indent").map_or(0, |m| m.as_str().len());
    let marker = if let Some(bullet) = caps.name("bullet") {
        Marker::Bullet(bullet.as_str().chars().next()?)
    } else {
        Marker::Number(caps.name("number")?.as_str().parse().ok()?)
    };
    let rest = caps.name("rest")?;
    let content = rest.as_str().to_string();
    // Counted from the matched text: "01." is longer than its rendering.
    let prefix_len = line[..rest.start()].chars().count();
    Some(ListLine {
        indent,
        marker,
        prefix_len,
        content,
    })
}

pub fn classify_line(line: &str) -> ListState {
    parse_line(line).map_or(ListState::NotList, |list| list.state())
}

/// List state of the line containing `offset`.
pub fn line_state_at(text: &str, offset: usize) -> ListLineState {
    let text = PlainText::new(text);
    classify_line(&text.line_text(offset)).into()
}

/// Replace `range` of the plain text with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub text: String,
}

impl Splice {
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at..at, text)
    }
}

/// The result of a list operation.
///
/// Splice ranges refer to the text before the edit, are sorted and do not
/// overlap, so they can be applied back to front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEdit {
    pub splices: Vec<Splice>,
    pub selection: Selection,
}

impl ListEdit {
    /// Apply the splices to a plain string.
    pub fn apply(&self, text: &str) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        for splice in self.splices.iter().rev() {
            let end = splice.range.end.min(chars.len());
            let start = splice.range.start.min(end);
            chars.splice(start..end, splice.text.chars());
        }
        chars.into_iter().collect()
    }

    pub fn is_noop(&self) -> bool {
        self.splices.is_empty()
    }
}

/// Turn the caret position or the selected lines into a list.
///
/// With a collapsed caret a first marker is inserted at the caret. With a
/// selection every non-blank line it touches gets a marker at its start,
/// numbering from 1, and the rewritten block is selected.
pub fn create_list(text: &str, selection: Selection, kind: ListKind) -> ListEdit {
    let doc = PlainText::new(text);
    let selection = selection.clamped(doc.len_chars());

    if selection.is_collapsed() {
        let marker = prefix(0, Marker::first(kind));
        let caret = selection.start + marker.chars().count();
        return ListEdit {
            splices: vec![Splice::insert(selection.start, marker)],
            selection: Selection::caret(caret),
        };
    }

    let first_line = doc.line_bounds(selection.start).start;
    let mut splices = Vec::new();
    let mut marker = Marker::first(kind);
    let mut inserted = 0;
    for line_start in doc.line_starts_in(selection.to_range()) {
        // A selection ending right after a `\n` does not touch the next line.
        if line_start != first_line && line_start >= selection.end {
            continue;
        }
        if doc.line_text(line_start).trim().is_empty() {
            continue;
        }
        let item = prefix(0, marker);
        inserted += item.chars().count();
        splices.push(Splice::insert(line_start, item));
        marker = marker.next();
    }

    tracing::debug!(target: "folio::list", ?kind, lines = splices.len(), "create list");
    ListEdit {
        splices,
        selection: Selection::new(first_line, selection.end + inserted, SelectionDirection::Forward),
    }
}

/// Enter key. Always produces an edit: list continuation, list exit or a
/// plain line break.
pub fn on_enter(text: &str, selection: Selection) -> ListEdit {
    let doc = PlainText::new(text);
    let selection = selection.clamped(doc.len_chars());
    let caret = selection.start;
    let removed = selection.len();

    // Work on the line as it reads once the selection is gone.
    let mut effective = String::with_capacity(text.len());
    effective.extend(text.chars().take(selection.start));
    effective.extend(text.chars().skip(selection.end));
    let effective = PlainText::new(&effective);
    let line = effective.line_bounds(caret);

    let Some(list) = parse_line(&effective.line_text(caret)) else {
        return ListEdit {
            splices: vec![Splice::new(selection.to_range(), "\n")],
            selection: Selection::caret(caret + 1),
        };
    };

    if list.is_marker_only() {
        tracing::debug!(target: "folio::list", line_start = line.start, "exit list");
        return ListEdit {
            splices: vec![Splice::new(line.start..line.end + removed, "\n")],
            selection: Selection::caret(line.start + 1),
        };
    }

    if caret < line.start + list.prefix_len {
        // Break before the marker: the item moves down unchanged.
        let kept = doc.slice(line.start..caret).unwrap_or_default();
        return ListEdit {
            splices: vec![Splice::new(line.start..selection.end, format!("\n{}", kept))],
            selection: Selection::caret(caret + 1),
        };
    }

    let continuation = format!("\n{}", prefix(list.indent, list.marker.next()));
    let caret_after = caret + continuation.chars().count();
    tracing::debug!(target: "folio::list", marker = %list.marker.next(), "continue list");
    ListEdit {
        splices: vec![Splice::new(selection.to_range(), continuation)],
        selection: Selection::caret(caret_after),
    }
}

/// Backspace inside a list marker strips the marker.
///
/// Returns `None` when the host's default delete should run instead.
pub fn on_backspace(text: &str, selection: Selection) -> Option<ListEdit> {
    if !selection.is_collapsed() {
        return None;
    }
    let doc = PlainText::new(text);
    let caret = selection.start.min(doc.len_chars());
    let line = doc.line_bounds(caret);
    let list = parse_line(&doc.line_text(caret))?;
    if caret - line.start > list.prefix_len {
        return None;
    }
    tracing::debug!(target: "folio::list", line_start = line.start, "strip list marker");
    Some(ListEdit {
        splices: vec![Splice::new(line.start..line.start + list.prefix_len, "")],
        selection: Selection::caret(line.start),
    })
}

/// Tab / Shift+Tab on a list line changes its level.
///
/// Returns `None` on a non-list line. At the level bounds the edit is empty
/// but still handled, so focus does not leave the surface.
pub fn on_tab(text: &str, selection: Selection, outdent: bool) -> Option<ListEdit> {
    let doc = PlainText::new(text);
    let selection = selection.clamped(doc.len_chars());
    let line = doc.line_bounds(selection.start);
    let list = parse_line(&doc.line_text(selection.start))?;

    let level = list.level();
    let new_level = if outdent {
        level.saturating_sub(1)
    } else {
        (level + 1).min(MAX_LIST_LEVEL)
    };
    if new_level == level {
        return Some(ListEdit {
            splices: Vec::new(),
            selection,
        });
    }

    let marker = match list.marker {
        Marker::Bullet(glyph) => Marker::Bullet(glyph),
        Marker::Number(_) => Marker::Number(1),
    };
    let new_prefix = prefix(new_level * INDENT_WIDTH, marker);
    let old_len = list.prefix_len;
    let new_len = new_prefix.chars().count();
    let prefix_end = line.start + old_len;
    let shift = |pos: usize| {
        if pos <= line.start {
            pos
        } else if pos < prefix_end {
            line.start + new_len
        } else {
            pos - old_len + new_len
        }
    };

    tracing::debug!(target: "folio::list", level, new_level, "change list level");
    Some(ListEdit {
        splices: vec![Splice::new(line.start..prefix_end, new_prefix)],
        selection: Selection::new(shift(selection.start), shift(selection.end), selection.direction),
    })
}
