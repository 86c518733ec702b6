//! Line index over the plain text.
//!
//! `PlainText` wraps a rope built from the editor's flat text so list and
//! selection helpers can ask for line, word and paragraph bounds in char
//! offsets without rescanning the string.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// Read-only rope over a snapshot of the plain text.
#[derive(Clone, Default)]
pub struct PlainText {
    rope: ropey::Rope,
}

impl PlainText {
    pub fn new(text: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(text),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    pub fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    /// Get character at offset. Returns None if out of bounds.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    /// Bounds of the line containing `offset`, excluding its `\n`.
    ///
    /// An offset right after a `\n` belongs to the following line.
    pub fn line_bounds(&self, offset: usize) -> Range<usize> {
        let offset = offset.min(self.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        start..start + len
    }

    /// Line starts of every line overlapping `range`.
    pub fn line_starts_in(&self, range: Range<usize>) -> Vec<usize> {
        let len = self.len_chars();
        let first = self.rope.char_to_line(range.start.min(len));
        let last = self.rope.char_to_line(range.end.min(len));
        (first..=last).map(|idx| self.rope.line_to_char(idx)).collect()
    }

    /// Text of the line containing `offset`, without its `\n`.
    pub fn line_text(&self, offset: usize) -> SmolStr {
        let bounds = self.line_bounds(offset);
        self.rope.slice(bounds).to_smolstr()
    }
}

impl std::fmt::Display for PlainText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for PlainText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Break,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c == '\n' {
        CharClass::Break
    } else if c.is_whitespace() {
        CharClass::Space
    } else if c.is_alphanumeric() || c == '_' || c == '\'' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// Range of the word (or whitespace/punctuation run) under `offset`.
///
/// Prefers the char after the offset, falling back to the one before it at
/// the end of a line. Never crosses a line break; a caret on an empty line
/// yields an empty range.
pub fn word_range_at(text: &PlainText, offset: usize) -> Range<usize> {
    let len = text.len_chars();
    let offset = offset.min(len);

    let pivot = match text.char_at(offset) {
        Some(c) if classify(c) != CharClass::Break => offset,
        _ if offset > 0 => match text.char_at(offset - 1) {
            Some(c) if classify(c) != CharClass::Break => offset - 1,
            _ => return offset..offset,
        },
        _ => return offset..offset,
    };
    let Some(pivot_char) = text.char_at(pivot) else {
        return offset..offset;
    };
    let class = classify(pivot_char);

    let mut start = pivot;
    while start > 0 {
        match text.char_at(start - 1) {
            Some(c) if classify(c) == class => start -= 1,
            _ => break,
        }
    }
    let mut end = pivot + 1;
    while let Some(c) = text.char_at(end) {
        if classify(c) != class {
            break;
        }
        end += 1;
    }
    start..end
}

/// Range of the paragraph (line) containing `offset`, excluding the `\n`.
pub fn paragraph_range_at(text: &PlainText, offset: usize) -> Range<usize> {
    text.line_bounds(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bounds() {
        let text = PlainText::new("first\nsecond\n\nlast");
        assert_eq!(text.line_bounds(0), 0..5);
        assert_eq!(text.line_bounds(5), 0..5);
        assert_eq!(text.line_bounds(6), 6..12);
        assert_eq!(text.line_bounds(13), 13..13);
        assert_eq!(text.line_bounds(14), 14..18);
        assert_eq!(text.line_bounds(99), 14..18);
        assert_eq!(text.line_text(8), "second");
    }

    #[test]
    fn test_line_bounds_trailing_newline() {
        let text = PlainText::new("a\n");
        assert_eq!(text.line_bounds(2), 2..2);
        assert_eq!(text.line_bounds(1), 0..1);
    }

    #[test]
    fn test_line_starts_in() {
        let text = PlainText::new("one\ntwo\nthree");
        assert_eq!(text.line_starts_in(1..9), vec![0, 4, 8]);
        assert_eq!(text.line_starts_in(5..5), vec![4]);
    }

    #[test]
    fn test_slice_and_char_at() {
        let text = PlainText::new("héllo");
        assert_eq!(text.slice(1..3).as_deref(), Some("él"));
        assert_eq!(text.slice(3..9), None);
        assert_eq!(text.char_at(1), Some('é'));
        assert_eq!(text.char_at(5), None);
        assert_eq!(text.to_string(), "héllo");
    }

    #[test]
    fn test_word_range_at() {
        let text = PlainText::new("hello, big world\nnext");
        assert_eq!(word_range_at(&text, 2), 0..5);
        assert_eq!(word_range_at(&text, 0), 0..5);
        // Punctuation is its own class.
        assert_eq!(word_range_at(&text, 5), 5..6);
        assert_eq!(word_range_at(&text, 6), 6..7);
        assert_eq!(word_range_at(&text, 9), 7..10);
        // End of line falls back to the previous char.
        assert_eq!(word_range_at(&text, 16), 11..16);
        assert_eq!(word_range_at(&text, 17), 17..21);
        assert_eq!(word_range_at(&text, 21), 17..21);
    }

    #[test]
    fn test_word_range_on_empty_line() {
        let text = PlainText::new("a\n\nb");
        assert_eq!(word_range_at(&text, 2), 2..2);
        let empty = PlainText::new("");
        assert_eq!(word_range_at(&empty, 0), 0..0);
        let breaks = PlainText::new("\n\n");
        assert_eq!(word_range_at(&breaks, 1), 1..1);
    }

    #[test]
    fn test_paragraph_range_at() {
        let text = PlainText::new("intro line\n• item one\n• item two");
        assert_eq!(paragraph_range_at(&text, 3), 0..10);
        assert_eq!(paragraph_range_at(&text, 15), 11..21);
    }
}
