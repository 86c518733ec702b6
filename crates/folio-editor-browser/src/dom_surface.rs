//! Contenteditable surface.
//!
//! Snapshots the editable element into `SurfaceNode`s, maps the DOM
//! Selection API to tree positions and writes rendered fragments back.
//! DOM text offsets are UTF-16 code units; tree positions count chars, so
//! every text-node offset is converted at this boundary.

use folio_editor_core::{NodePosition, RawSelection, SurfaceAdapter, SurfaceError, SurfaceNode};
use wasm_bindgen::JsCast;
use web_sys::Node;

/// Surface backed by the contenteditable element with id `editor_id`.
///
/// Holds only the id; the element is looked up on every call so the surface
/// survives the host re-mounting the element.
#[derive(Debug, Clone)]
pub struct DomSurface {
    editor_id: String,
}

impl DomSurface {
    /// Create a surface for the given editor element.
    pub fn new(editor_id: impl Into<String>) -> Self {
        Self {
            editor_id: editor_id.into(),
        }
    }

    /// Get the editor element ID.
    pub fn editor_id(&self) -> &str {
        &self.editor_id
    }

    fn document(&self) -> Result<web_sys::Document, SurfaceError> {
        let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
        window.document().ok_or(SurfaceError::NoDocument)
    }

    fn editor_element(&self) -> Result<web_sys::Element, SurfaceError> {
        self.document()?
            .get_element_by_id(&self.editor_id)
            .ok_or_else(|| SurfaceError::ElementNotFound(self.editor_id.clone()))
    }

    fn dom_selection(&self) -> Result<web_sys::Selection, SurfaceError> {
        let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
        window
            .get_selection()
            .map_err(|e| SurfaceError::Dom(format!("get_selection failed: {:?}", e)))?
            .ok_or_else(|| SurfaceError::Dom("no selection object".into()))
    }
}

impl SurfaceAdapter for DomSurface {
    fn snapshot(&self) -> Result<SurfaceNode, SurfaceError> {
        let editor = self.editor_element()?;
        Ok(snapshot_node(editor.as_ref()))
    }

    fn raw_selection(&self) -> Option<RawSelection> {
        let editor = self.editor_element().ok()?;
        let selection = self.dom_selection().ok()?;
        if selection.range_count() == 0 {
            return None;
        }

        let anchor_node = selection.anchor_node()?;
        let focus_node = selection.focus_node()?;
        let anchor_offset = selection.anchor_offset();
        let focus_offset = selection.focus_offset();

        tracing::trace!(
            target: "folio::surface",
            anchor_node_name = %anchor_node.node_name(),
            anchor_offset,
            focus_node_name = %focus_node.node_name(),
            focus_offset,
            "browser selection state"
        );

        // A selection outside the editor is not ours.
        let anchor = dom_to_position(editor.as_ref(), &anchor_node, anchor_offset)?;
        let focus = dom_to_position(editor.as_ref(), &focus_node, focus_offset)?;
        Some(RawSelection { anchor, focus })
    }

    fn set_raw_selection(&mut self, selection: &RawSelection) -> Result<(), SurfaceError> {
        let editor = self.editor_element()?;
        let (anchor_node, anchor_offset) = position_to_dom(editor.as_ref(), &selection.anchor)?;
        let (focus_node, focus_offset) = position_to_dom(editor.as_ref(), &selection.focus)?;

        self.dom_selection()?
            .set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
            .map_err(|e| SurfaceError::Dom(format!("set_base_and_extent failed: {:?}", e)))
    }

    fn replace_content(&mut self, nodes: Vec<SurfaceNode>) -> Result<(), SurfaceError> {
        let document = self.document()?;
        let editor = self.editor_element()?;

        while let Some(child) = editor.first_child() {
            editor
                .remove_child(&child)
                .map_err(|e| SurfaceError::Dom(format!("remove_child failed: {:?}", e)))?;
        }
        for node in &nodes {
            let dom_node = build_node(&document, node)?;
            editor
                .append_child(&dom_node)
                .map_err(|e| SurfaceError::Dom(format!("append_child failed: {:?}", e)))?;
        }

        tracing::trace!(target: "folio::surface", nodes = nodes.len(), "replaced editor content");
        Ok(())
    }
}

/// Snapshot a DOM subtree.
///
/// Every DOM child gets a snapshot child so paths index `childNodes`
/// directly; comments and other non-content nodes become empty text.
fn snapshot_node(node: &Node) -> SurfaceNode {
    match node.node_type() {
        Node::TEXT_NODE => SurfaceNode::text(normalize_spaces(
            &node.text_content().unwrap_or_default(),
        )),
        Node::ELEMENT_NODE => {
            let Some(element) = node.dyn_ref::<web_sys::Element>() else {
                return SurfaceNode::text("");
            };
            let tag = element.tag_name().to_ascii_lowercase();
            if tag == "br" {
                return SurfaceNode::LineBreak;
            }
            let children = node.child_nodes();
            let children = (0..children.length())
                .filter_map(|i| children.item(i))
                .map(|child| snapshot_node(&child))
                .collect();
            SurfaceNode::element(&tag, element.get_attribute("style"), children)
        }
        _ => SurfaceNode::text(""),
    }
}

/// Browsers store typed spaces as U+00A0 in a contenteditable so they do
/// not collapse. The model sees a plain space; the char count is unchanged.
fn normalize_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

fn build_node(document: &web_sys::Document, node: &SurfaceNode) -> Result<Node, SurfaceError> {
    let dom_err = |e: wasm_bindgen::JsValue| SurfaceError::Dom(format!("{:?}", e));
    match node {
        SurfaceNode::Text(text) => Ok(document.create_text_node(text).into()),
        SurfaceNode::LineBreak => Ok(document.create_element("br").map_err(dom_err)?.into()),
        SurfaceNode::Element { tag, css, children } => {
            let element = document.create_element(tag).map_err(dom_err)?;
            if let Some(css) = css {
                element.set_attribute("style", css).map_err(dom_err)?;
            }
            for child in children {
                element.append_child(&build_node(document, child)?).map_err(dom_err)?;
            }
            Ok(element.into())
        }
    }
}

/// Index of `child` in `parent.childNodes`.
fn child_index(parent: &Node, child: &Node) -> Option<usize> {
    let children = parent.child_nodes();
    (0..children.length()).find_map(|i| {
        children
            .item(i)
            .filter(|node| node.is_same_node(Some(child)))
            .map(|_| i as usize)
    })
}

/// Convert a DOM boundary point into a tree position relative to `editor`.
///
/// Returns `None` when the node is not inside the editor.
fn dom_to_position(editor: &Node, node: &Node, offset: u32) -> Option<NodePosition> {
    let mut path = Vec::new();
    let mut current = node.clone();
    while !current.is_same_node(Some(editor)) {
        let parent = current.parent_node()?;
        path.push(child_index(&parent, &current)?);
        current = parent;
    }
    path.reverse();

    let offset = if node.node_type() == Node::TEXT_NODE {
        let text = node.text_content().unwrap_or_default();
        utf16_to_char_offset(&text, offset as usize)
    } else {
        offset as usize
    };
    Some(NodePosition::new(path, offset))
}

/// Resolve a tree position to a DOM boundary point under `editor`.
fn position_to_dom(editor: &Node, position: &NodePosition) -> Result<(Node, u32), SurfaceError> {
    let mut node = editor.clone();
    for &index in &position.path {
        node = node
            .child_nodes()
            .item(index as u32)
            .ok_or(SurfaceError::InvalidPosition)?;
    }

    let offset = if node.node_type() == Node::TEXT_NODE {
        let text = node.text_content().unwrap_or_default();
        char_to_utf16_offset(&text, position.offset)
    } else {
        position.offset
    };
    Ok((node, offset as u32))
}

/// Char offset for a UTF-16 offset into `text`, clamped to its length.
///
/// An offset falling inside a surrogate pair resolves to the char after it.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in text.chars().enumerate() {
        if units >= utf16_offset {
            return i;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}

/// UTF-16 offset for a char offset into `text`, clamped to its length.
pub fn char_to_utf16_offset(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}
