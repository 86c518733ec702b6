//! Editable surface abstraction.
//!
//! The engine never touches a platform tree directly. A `SurfaceAdapter`
//! hands out snapshots of its native tree as `SurfaceNode`s, reports the
//! native selection as tree positions, and accepts rendered fragments to
//! replace its content. Everything else (offset mapping, run extraction,
//! list handling, history) works on those snapshots.
//!
//! `MemorySurface` is an in-memory adapter used by tests and by hosts that
//! have no native tree of their own.

use smol_str::SmolStr;

use crate::offset_map;
use crate::runs::{self, StyledRun};
use crate::selection::{self, Selection};

/// Error type for surface operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("position does not resolve to a node")]
    InvalidPosition,
    #[error("dom operation failed: {0}")]
    Dom(String),
}

/// A node in a snapshot of the surface's native tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    /// A text node.
    Text(String),
    /// An explicit line break (`<br>` equivalent). Counts as one `\n`.
    LineBreak,
    /// A container. `css` holds the raw inline style declarations, if any.
    Element {
        tag: SmolStr,
        css: Option<String>,
        children: Vec<SurfaceNode>,
    },
}

/// Child indices from the root down to a node.
pub type NodePath = Vec<usize>;

/// A position inside the tree, DOM style.
///
/// When `path` names a text node, `offset` is a char offset into its text.
/// When it names an element, `offset` is a child index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePosition {
    pub path: NodePath,
    pub offset: usize,
}

impl NodePosition {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// A native selection expressed as tree positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection {
    pub anchor: NodePosition,
    pub focus: NodePosition,
}

impl RawSelection {
    pub fn collapsed(position: NodePosition) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }
}

impl SurfaceNode {
    pub fn text(text: impl Into<String>) -> Self {
        SurfaceNode::Text(text.into())
    }

    pub fn element(tag: &str, css: Option<String>, children: Vec<SurfaceNode>) -> Self {
        SurfaceNode::Element {
            tag: SmolStr::new(tag),
            css,
            children,
        }
    }

    /// The editable root that wraps a rendered fragment.
    pub fn root(children: Vec<SurfaceNode>) -> Self {
        SurfaceNode::Element {
            tag: SmolStr::new_static("div"),
            css: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, SurfaceNode::Element { .. })
    }

    pub fn children(&self) -> &[SurfaceNode] {
        match self {
            SurfaceNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Length this node contributes to the flat text, in chars.
    pub fn text_len(&self) -> usize {
        match self {
            SurfaceNode::Text(text) => text.chars().count(),
            SurfaceNode::LineBreak => 1,
            SurfaceNode::Element { children, .. } => children.iter().map(|c| c.text_len()).sum(),
        }
    }

    /// Flat text of this subtree, line breaks rendered as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for (_, leaf) in self.leaves() {
            match leaf {
                SurfaceNode::Text(text) => out.push_str(text),
                SurfaceNode::LineBreak => out.push('\n'),
                SurfaceNode::Element { .. } => {}
            }
        }
        out
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&SurfaceNode> {
        let mut node = self;
        for &index in path {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut SurfaceNode> {
        let mut node = self;
        for &index in path {
            node = match node {
                SurfaceNode::Element { children, .. } => children.get_mut(index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// All leaves (text and line-break nodes) in document order, with paths.
    pub fn leaves(&self) -> Vec<(NodePath, &SurfaceNode)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect_leaves(self, &mut path, &mut out);
        out
    }
}

fn collect_leaves<'a>(
    node: &'a SurfaceNode,
    path: &mut NodePath,
    out: &mut Vec<(NodePath, &'a SurfaceNode)>,
) {
    if node.is_leaf() {
        out.push((path.clone(), node));
        return;
    }
    for (index, child) in node.children().iter().enumerate() {
        path.push(index);
        collect_leaves(child, path, out);
        path.pop();
    }
}

/// The host's editable surface.
///
/// Implementations wrap a platform primitive (a contenteditable element, a
/// native text view). The engine treats it as the only mutable shared
/// resource: every operation snapshots it, computes, and writes back before
/// returning to the event loop.
pub trait SurfaceAdapter {
    /// Snapshot of the native tree, rooted at the editable element.
    fn snapshot(&self) -> Result<SurfaceNode, SurfaceError>;

    /// The native selection, or `None` when the surface has no active range.
    fn raw_selection(&self) -> Option<RawSelection>;

    /// Install a native selection.
    fn set_raw_selection(&mut self, selection: &RawSelection) -> Result<(), SurfaceError>;

    /// Replace the whole content with a rendered fragment.
    fn replace_content(&mut self, nodes: Vec<SurfaceNode>) -> Result<(), SurfaceError>;

    // === Provided ===

    /// Plain text of the surface. Empty if the snapshot fails.
    fn get_text(&self) -> String {
        self.snapshot()
            .map(|root| root.plain_text())
            .unwrap_or_default()
    }

    /// Current selection in flat offsets.
    fn selection_offsets(&self) -> Option<Selection> {
        let root = self.snapshot().ok()?;
        selection::capture(&root, self.raw_selection().as_ref())
    }

    /// Install a selection given in flat offsets.
    ///
    /// Returns false when the selection cannot be placed (no text, or the
    /// adapter refused); callers carry on without caret restoration.
    fn set_selection_offsets(&mut self, selection: &Selection) -> bool {
        let Ok(root) = self.snapshot() else {
            return false;
        };
        let Some(raw) = selection::restore(&root, selection) else {
            tracing::debug!(target: "folio::surface", ?selection, "selection not restorable");
            return false;
        };
        match self.set_raw_selection(&raw) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(target: "folio::surface", error = %e, "set_raw_selection failed");
                false
            }
        }
    }

    /// Render runs and replace the content with them.
    fn replace_runs(&mut self, runs: &[StyledRun]) -> Result<(), SurfaceError> {
        self.replace_content(runs::render(runs))
    }
}

/// In-memory surface: a `SurfaceNode` tree plus a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    root: SurfaceNode,
    selection: Option<RawSelection>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            root: SurfaceNode::root(Vec::new()),
            selection: None,
        }
    }
}

impl MemorySurface {
    pub fn new(root: SurfaceNode) -> Self {
        Self {
            root,
            selection: None,
        }
    }

    /// Surface holding the rendered form of `runs`.
    pub fn from_runs(runs: &[StyledRun]) -> Self {
        Self::new(SurfaceNode::root(runs::render(runs)))
    }

    pub fn root(&self) -> &SurfaceNode {
        &self.root
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select a flat range, anchor at `anchor`, focus at `focus`.
    pub fn select(&mut self, anchor: usize, focus: usize) -> bool {
        self.set_selection_offsets(&Selection::from_anchor_focus(anchor, focus))
    }

    /// Put a collapsed caret at a flat offset.
    pub fn place_caret(&mut self, offset: usize) -> bool {
        self.select(offset, offset)
    }

    /// Simulate native typing: insert text at the focus, moving the caret
    /// past it. Mirrors what a host surface does before it fires `input`.
    pub fn type_text(&mut self, text: &str) -> bool {
        let Some(raw) = self.selection.clone() else {
            return false;
        };
        let focus = raw.focus;
        let inserted = text.chars().count();
        let caret = match self.root.node_at_mut(&focus.path) {
            Some(SurfaceNode::Text(existing)) => {
                let byte = existing
                    .char_indices()
                    .nth(focus.offset)
                    .map(|(i, _)| i)
                    .unwrap_or(existing.len());
                existing.insert_str(byte, text);
                NodePosition::new(focus.path.clone(), focus.offset + inserted)
            }
            Some(SurfaceNode::Element { children, .. }) => {
                let index = focus.offset.min(children.len());
                children.insert(index, SurfaceNode::text(text));
                let mut path = focus.path.clone();
                path.push(index);
                NodePosition::new(path, inserted)
            }
            _ => return false,
        };
        self.selection = Some(RawSelection::collapsed(caret));
        true
    }

    /// Flat offset of the current focus, if any.
    pub fn caret_offset(&self) -> Option<usize> {
        let raw = self.selection.as_ref()?;
        Some(offset_map::to_flat_offset(&self.root, &raw.focus))
    }
}

impl SurfaceAdapter for MemorySurface {
    fn snapshot(&self) -> Result<SurfaceNode, SurfaceError> {
        Ok(self.root.clone())
    }

    fn raw_selection(&self) -> Option<RawSelection> {
        self.selection.clone()
    }

    fn set_raw_selection(&mut self, selection: &RawSelection) -> Result<(), SurfaceError> {
        if self.root.node_at(&selection.anchor.path).is_none()
            || self.root.node_at(&selection.focus.path).is_none()
        {
            return Err(SurfaceError::InvalidPosition);
        }
        self.selection = Some(selection.clone());
        Ok(())
    }

    fn replace_content(&mut self, nodes: Vec<SurfaceNode>) -> Result<(), SurfaceError> {
        self.root = SurfaceNode::root(nodes);
        // A content rewrite invalidates native positions, as it does in a DOM.
        self.selection = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SurfaceNode {
        SurfaceNode::root(vec![
            SurfaceNode::element("span", None, vec![SurfaceNode::text("ab")]),
            SurfaceNode::LineBreak,
            SurfaceNode::element(
                "span",
                Some("font-weight: bold".into()),
                vec![SurfaceNode::text("cd")],
            ),
        ])
    }

    #[test]
    fn test_plain_text_and_len() {
        let tree = sample_tree();
        assert_eq!(tree.plain_text(), "ab\ncd");
        assert_eq!(tree.text_len(), 5);
    }

    #[test]
    fn test_leaves_in_document_order() {
        let tree = sample_tree();
        let paths: Vec<NodePath> = tree.leaves().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![vec![0, 0], vec![1], vec![2, 0]]);
    }

    #[test]
    fn test_node_at() {
        let tree = sample_tree();
        assert_eq!(tree.node_at(&[2, 0]), Some(&SurfaceNode::text("cd")));
        assert_eq!(tree.node_at(&[1]), Some(&SurfaceNode::LineBreak));
        assert_eq!(tree.node_at(&[5]), None);
        assert_eq!(tree.node_at(&[1, 0]), None);
    }

    #[test]
    fn test_memory_surface_selection_offsets() {
        let mut surface = MemorySurface::new(sample_tree());
        assert!(surface.selection_offsets().is_none());

        assert!(surface.select(1, 4));
        let sel = surface.selection_offsets().unwrap();
        assert_eq!((sel.start, sel.end), (1, 4));
    }

    #[test]
    fn test_memory_surface_type_text() {
        let mut surface = MemorySurface::new(sample_tree());
        surface.place_caret(1);
        assert!(surface.type_text("XY"));
        assert_eq!(surface.get_text(), "aXYb\ncd");
        assert_eq!(surface.caret_offset(), Some(3));
    }

    #[test]
    fn test_replace_content_drops_selection() {
        let mut surface = MemorySurface::new(sample_tree());
        surface.place_caret(2);
        surface
            .replace_content(vec![SurfaceNode::text("fresh")])
            .unwrap();
        assert_eq!(surface.get_text(), "fresh");
        assert!(surface.raw_selection().is_none());
    }

    #[test]
    fn test_empty_surface_cannot_place_caret() {
        let mut surface = MemorySurface::default();
        assert!(!surface.place_caret(0));
        assert!(surface.selection_offsets().is_none());
    }
}
