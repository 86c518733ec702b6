//! Selection capture and restoration in flat offsets.

use std::ops::Range;

use crate::offset_map::{to_flat_offset, to_node_position};
use crate::surface::{RawSelection, SurfaceNode};

/// Which end of the selection the user is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionDirection {
    Forward,
    Backward,
    #[default]
    None,
}

/// A selection in flat char offsets, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: SelectionDirection,
}

impl Selection {
    /// Create a selection; bounds are reordered if needed.
    pub fn new(start: usize, end: usize, direction: SelectionDirection) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            direction,
        }
    }

    /// Create a collapsed selection (cursor position).
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset, SelectionDirection::None)
    }

    /// Build from anchor/focus offsets, inferring direction.
    pub fn from_anchor_focus(anchor: usize, focus: usize) -> Self {
        let direction = if anchor == focus {
            SelectionDirection::None
        } else if anchor < focus {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        };
        Self::new(anchor, focus, direction)
    }

    /// Where the selection started.
    pub fn anchor(&self) -> usize {
        match self.direction {
            SelectionDirection::Backward => self.end,
            _ => self.start,
        }
    }

    /// Where the cursor is now.
    pub fn focus(&self) -> usize {
        match self.direction {
            SelectionDirection::Backward => self.start,
            _ => self.end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamp both ends to a document length.
    pub fn clamped(&self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
            direction: self.direction,
        }
    }
}

/// Capture the native selection as flat offsets.
///
/// Returns `None` when the host reports no active range.
pub fn capture(root: &SurfaceNode, raw: Option<&RawSelection>) -> Option<Selection> {
    let raw = raw?;
    let anchor = to_flat_offset(root, &raw.anchor);
    let focus = to_flat_offset(root, &raw.focus);
    Some(Selection::from_anchor_focus(anchor, focus))
}

/// Resolve a flat selection back to tree positions.
///
/// Returns `None` when the tree has no text to place a caret in; callers
/// treat that as a silent no-op.
pub fn restore(root: &SurfaceNode, selection: &Selection) -> Option<RawSelection> {
    if root.text_len() == 0 {
        return None;
    }
    let len = root.text_len();
    let selection = selection.clamped(len);
    Some(RawSelection {
        anchor: to_node_position(root, selection.anchor()),
        focus: to_node_position(root, selection.focus()),
    })
}
