//! Conversion between flat char offsets and tree positions.
//!
//! The flat coordinate system is the plain text of the surface: every text
//! node contributes its chars, every line-break node contributes one `\n`.
//! Selections and carets are stored as flat offsets; tree positions only
//! exist at the boundary with the surface.

use crate::surface::{NodePath, NodePosition, SurfaceNode};

/// Sum of leaf lengths for every leaf strictly before `key` in document order.
///
/// Paths compare lexicographically, so a boundary key `parent ++ [i]` sorts
/// after everything in children `0..i` and before child `i` itself.
fn len_before(root: &SurfaceNode, key: &[usize]) -> usize {
    root.leaves()
        .into_iter()
        .filter(|(path, _)| path.as_slice() < key)
        .map(|(_, leaf)| leaf.text_len())
        .sum()
}

/// Convert a tree position into a flat offset.
///
/// Positions that do not resolve (stale paths) clamp to the end of the text.
pub fn to_flat_offset(root: &SurfaceNode, position: &NodePosition) -> usize {
    match root.node_at(&position.path) {
        Some(SurfaceNode::Text(text)) => {
            len_before(root, &position.path) + position.offset.min(text.chars().count())
        }
        Some(SurfaceNode::LineBreak) => len_before(root, &position.path) + position.offset.min(1),
        Some(SurfaceNode::Element { children, .. }) => {
            let mut boundary = position.path.clone();
            boundary.push(position.offset.min(children.len()));
            len_before(root, &boundary)
        }
        None => {
            tracing::trace!(target: "folio::offset_map", ?position, "stale position, clamping to end");
            root.text_len()
        }
    }
}

/// Convert a flat offset into a tree position.
///
/// Offsets on a boundary between two text nodes resolve to the start of the
/// later node. An offset directly before a line break resolves to the
/// element position in front of it. Offsets at or past the end resolve to
/// the end of the last leaf; an empty tree resolves to `(root, 0)`.
pub fn to_node_position(root: &SurfaceNode, flat_offset: usize) -> NodePosition {
    let leaves = root.leaves();
    let mut accumulated = 0;

    for (path, leaf) in &leaves {
        match leaf {
            SurfaceNode::Text(text) => {
                let len = text.chars().count();
                if flat_offset >= accumulated && flat_offset < accumulated + len {
                    return NodePosition::new(path.clone(), flat_offset - accumulated);
                }
                accumulated += len;
            }
            SurfaceNode::LineBreak => {
                if flat_offset == accumulated {
                    return before_leaf(path);
                }
                accumulated += 1;
            }
            SurfaceNode::Element { .. } => {}
        }
    }

    match leaves.last() {
        Some((path, SurfaceNode::Text(text))) => {
            NodePosition::new(path.clone(), text.chars().count())
        }
        Some((path, _)) => after_leaf(path),
        None => NodePosition::default(),
    }
}

fn before_leaf(path: &NodePath) -> NodePosition {
    match path.split_last() {
        Some((index, parent)) => NodePosition::new(parent.to_vec(), *index),
        None => NodePosition::default(),
    }
}

fn after_leaf(path: &NodePath) -> NodePosition {
    match path.split_last() {
        Some((index, parent)) => NodePosition::new(parent.to_vec(), index + 1),
        None => NodePosition::new(Vec::new(), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> SurfaceNode {
        SurfaceNode::root(vec![
            SurfaceNode::element("span", None, vec![SurfaceNode::text("hel")]),
            SurfaceNode::element(
                "span",
                Some("font-style: italic".into()),
                vec![SurfaceNode::text("lo")],
            ),
            SurfaceNode::LineBreak,
            SurfaceNode::text(""),
            SurfaceNode::element("span", None, vec![SurfaceNode::text("wörld")]),
        ])
    }

    #[test]
    fn test_to_flat_offset_text_nodes() {
        let root = tree();
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![0, 0], 0)), 0);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![0, 0], 2)), 2);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![1, 0], 1)), 4);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![4, 0], 5)), 11);
    }

    #[test]
    fn test_to_flat_offset_element_positions() {
        let root = tree();
        // Child index positions on the root.
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![], 0)), 0);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![], 2)), 5);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![], 3)), 6);
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![], 99)), 11);
    }

    #[test]
    fn test_to_flat_offset_stale_path_clamps() {
        let root = tree();
        assert_eq!(to_flat_offset(&root, &NodePosition::new(vec![7, 3], 1)), 11);
    }

    #[test]
    fn test_boundary_biases_forward() {
        let root = tree();
        // Offset 3 is the end of "hel" and the start of "lo".
        assert_eq!(to_node_position(&root, 3), NodePosition::new(vec![1, 0], 0));
    }

    #[test]
    fn test_position_before_line_break() {
        let root = tree();
        assert_eq!(to_node_position(&root, 5), NodePosition::new(vec![], 2));
        // After the break, the empty text node is skipped.
        assert_eq!(to_node_position(&root, 6), NodePosition::new(vec![4, 0], 0));
    }

    #[test]
    fn test_past_end_resolves_to_last_text() {
        let root = tree();
        assert_eq!(to_node_position(&root, 11), NodePosition::new(vec![4, 0], 5));
        assert_eq!(to_node_position(&root, 500), NodePosition::new(vec![4, 0], 5));
    }

    #[test]
    fn test_trailing_line_break_end() {
        let root = SurfaceNode::root(vec![SurfaceNode::text("a"), SurfaceNode::LineBreak]);
        assert_eq!(to_node_position(&root, 2), NodePosition::new(vec![], 2));
        assert_eq!(to_flat_offset(&root, &to_node_position(&root, 2)), 2);
    }

    #[test]
    fn test_empty_root() {
        let root = SurfaceNode::root(vec![]);
        assert_eq!(to_node_position(&root, 0), NodePosition::default());
        assert_eq!(to_node_position(&root, 4), NodePosition::default());
        assert_eq!(to_flat_offset(&root, &NodePosition::default()), 0);
    }

    #[test]
    fn test_roundtrip_every_offset() {
        let root = tree();
        let len = root.text_len();
        assert_eq!(len, 11);
        for offset in 0..=len {
            let position = to_node_position(&root, offset);
            assert_eq!(to_flat_offset(&root, &position), offset, "offset {offset}");
        }
    }

    #[test]
    fn test_roundtrip_nested_and_adjacent_breaks() {
        let root = SurfaceNode::root(vec![
            SurfaceNode::LineBreak,
            SurfaceNode::element(
                "span",
                None,
                vec![
                    SurfaceNode::element("b", None, vec![SurfaceNode::text("x")]),
                    SurfaceNode::LineBreak,
                    SurfaceNode::LineBreak,
                    SurfaceNode::text("yz"),
                ],
            ),
        ]);
        for offset in 0..=root.text_len() {
            let position = to_node_position(&root, offset);
            assert_eq!(to_flat_offset(&root, &position), offset, "offset {offset}");
        }
    }
}
