//! Position resolution
//!
//! Maps a raw position in the editable document to the enclosing block
//! container, and a block id to its current bounds. Both directions are
//! pure: nothing here mutates the tree, and resolved bounds are never
//! cached across edits.

use crate::errors::{BlockDocError, Result};
use crate::model::node::{NodeId, NodeKind, Tree};

/// Structural description of the block enclosing a position
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    /// The block container node
    pub container: NodeId,
    /// Opening and closing bounds of the whole block
    pub container_range: (u64, u64),
    /// The content node
    pub content: NodeId,
    /// Opening and closing bounds of the content node
    pub content_range: (u64, u64),
    /// The group node holding nested children, if the block has any
    pub group: Option<NodeId>,
}

impl BlockInfo {
    /// First editable position inside the content node
    pub fn content_interior_start(&self) -> u64 {
        self.content_range.0 + 1
    }

    /// Last editable position inside the content node (cursor may sit here)
    pub fn content_interior_end(&self) -> u64 {
        self.content_range.1 - 1
    }
}

fn info_for(tree: &Tree, container: NodeId) -> Result<BlockInfo> {
    let (_, content, group) = tree.container_parts(container)?;
    let start = tree.start_of(container)?;
    let content_start = start + 1;
    let content_size = tree.node_size(content);
    Ok(BlockInfo {
        container,
        container_range: (start, start + tree.node_size(container)),
        content,
        content_range: (content_start, content_start + content_size),
        group,
    })
}

/// Resolve the deepest block container whose bounds contain `position`
///
/// Fails with `PositionOutsideBlock` when the position does not fall inside
/// any container; callers must treat that as "no block here" rather than
/// clamping.
pub fn resolve_block_at(tree: &Tree, position: u64) -> Result<BlockInfo> {
    if position >= tree.doc_len() {
        return Err(BlockDocError::PositionOutsideBlock { position });
    }

    let mut children: Vec<NodeId> = tree.doc_children().to_vec();
    let mut offset = 0u64;
    let mut found: Option<NodeId> = None;

    loop {
        let mut hit: Option<(NodeId, u64)> = None;
        for child in children.iter().copied() {
            let size = tree.node_size(child);
            if position >= offset && position < offset + size {
                hit = Some((child, offset));
                break;
            }
            offset += size;
        }
        // No child contains the position: it sits on a group's own token,
        // which belongs to the container already found
        let Some((container, container_start)) = hit else {
            break;
        };
        found = Some(container);

        // Descend when the position falls strictly inside the nested
        // children; positions on the group's opening token (or the
        // container's own tokens) belong to this container.
        let (_, content, group) = tree.container_parts(container)?;
        let Some(group) = group else { break };
        let group_start = container_start + 1 + tree.node_size(content);
        if position <= group_start {
            break;
        }
        match &tree.expect_node(group)?.kind {
            NodeKind::Group {
                children: group_children,
            } => {
                children = group_children.clone();
                offset = group_start + 1;
            }
            _ => {
                return Err(BlockDocError::internal(format!(
                    "container {} group child is not a group",
                    container
                )))
            }
        }
    }

    match found {
        Some(container) => info_for(tree, container),
        None => Err(BlockDocError::PositionOutsideBlock { position }),
    }
}

/// Resolve a block id to its container and current bounds
///
/// This is how the command layer translates block ids to raw ranges over
/// the pre-edit tree.
pub fn resolve_block(tree: &Tree, block_id: &str) -> Result<BlockInfo> {
    let container = tree
        .find_block(block_id)
        .ok_or_else(|| BlockDocError::BlockNotFound {
            block_id: block_id.to_string(),
        })?;
    info_for(tree, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::{BlockContent, Inline};
    use crate::model::node::ContainerAttrs;

    fn paragraph(text: &str) -> BlockContent {
        BlockContent::Paragraph {
            inline: vec![Inline::text(text)],
        }
    }

    fn two_block_tree() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let a = tree.new_container(ContainerAttrs::with_id("a"), paragraph("ab"));
        let b = tree.new_container(ContainerAttrs::with_id("b"), paragraph("cd"));
        let root = tree.root();
        tree.insert_into(root, 0, &[a, b]).unwrap();
        (tree, a, b)
    }

    #[test]
    fn test_every_interior_position_resolves_to_its_block() {
        // block a spans [0, 6), block b spans [6, 12)
        let (tree, a, b) = two_block_tree();
        for pos in 0..6 {
            assert_eq!(resolve_block_at(&tree, pos).unwrap().container, a);
        }
        for pos in 6..12 {
            assert_eq!(resolve_block_at(&tree, pos).unwrap().container, b);
        }
    }

    #[test]
    fn test_position_past_document_fails() {
        let (tree, _, _) = two_block_tree();
        let err = resolve_block_at(&tree, 12).unwrap_err();
        assert!(matches!(
            err,
            BlockDocError::PositionOutsideBlock { position: 12 }
        ));
    }

    #[test]
    fn test_empty_document_has_no_blocks() {
        let tree = Tree::new();
        assert!(resolve_block_at(&tree, 0).is_err());
    }

    #[test]
    fn test_nested_child_wins_over_parent() {
        let mut tree = Tree::new();
        let child = tree.new_container(ContainerAttrs::with_id("child"), paragraph("x"));
        let parent = tree.new_container(ContainerAttrs::with_id("parent"), paragraph("y"));
        tree.attach_children(parent, vec![child]).unwrap();
        let root = tree.root();
        tree.insert_into(root, 0, &[parent]).unwrap();

        // parent [0, 12): content [1, 4), group [4, 11), child [5, 10)
        let info = resolve_block_at(&tree, 6).unwrap();
        assert_eq!(info.container, child);
        assert_eq!(info.container_range, (5, 10));

        // The group's opening token belongs to the parent block
        let info = resolve_block_at(&tree, 4).unwrap();
        assert_eq!(info.container, parent);
    }

    #[test]
    fn test_resolve_block_reports_bounds() {
        let (tree, _, _) = two_block_tree();
        let info = resolve_block(&tree, "b").unwrap();
        assert_eq!(info.container_range, (6, 12));
        assert_eq!(info.content_range, (7, 11));
        assert!(info.group.is_none());
    }

    #[test]
    fn test_resolve_missing_block_fails() {
        let (tree, _, _) = two_block_tree();
        assert!(matches!(
            resolve_block(&tree, "zzz").unwrap_err(),
            BlockDocError::BlockNotFound { .. }
        ));
    }
}
