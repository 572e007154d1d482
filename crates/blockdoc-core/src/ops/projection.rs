//! Projection between the document tree and portable blocks
//!
//! Round-trip invariant: `document → blocks → document` preserves every
//! externally visible attribute (id, type, props, content, nesting).
//! Internal-only container fields (`depth`, `depth_change`) are accepted on
//! the way in but never emitted on the way out.

use crate::errors::Result;
use crate::model::block::Block;
use crate::model::content::{BlockContent, Inline};
use crate::model::node::{ContainerAttrs, NodeId, Tree};

/// Project one container (and its nested children) to a portable block
pub fn block_from_container(tree: &Tree, container: NodeId) -> Result<Block> {
    let (attrs, content_id, group) = tree.container_parts(container)?;
    let content = tree.content(content_id)?;

    let mut props = content.props();
    if let Some(alias) = &attrs.alias {
        props.insert("alias".to_string(), alias.clone().into());
    }
    if let Some(color) = &attrs.color {
        props.insert("color".to_string(), color.clone().into());
    }
    if let Some(style) = &attrs.style {
        props.insert("style".to_string(), style.clone().into());
    }

    let inline = match content.inline() {
        Some(runs) => runs.to_vec(),
        None => match content {
            BlockContent::CodeBlock { text, .. } if !text.is_empty() => {
                vec![Inline::text(text.clone())]
            }
            _ => Vec::new(),
        },
    };

    let mut children = Vec::new();
    if let Some(group) = group {
        for child in tree.children_of(group)? {
            children.push(block_from_container(tree, *child)?);
        }
    }

    Ok(Block {
        id: Some(attrs.id.clone()),
        block_type: content.type_name().to_string(),
        props,
        content: inline,
        children,
    })
}

/// Build a detached container subtree from a portable block
///
/// A missing or empty id gets a fresh one; unknown props are ignored (and
/// logged) per the closed-schema policy.
pub fn container_from_block(tree: &mut Tree, block: &Block) -> Result<NodeId> {
    let mut attrs = match &block.id {
        Some(id) if !id.is_empty() => ContainerAttrs::with_id(id),
        _ => ContainerAttrs::with_fresh_id(),
    };
    let mut content = BlockContent::from_type(&block.block_type, block.content.clone());

    for (key, value) in &block.props {
        match key.as_str() {
            "alias" => attrs.alias = value.as_str().map(str::to_string),
            "color" => attrs.color = value.as_str().map(str::to_string),
            "style" => attrs.style = value.as_str().map(str::to_string),
            "depth" => attrs.depth = value.as_i64(),
            "depthChange" => attrs.depth_change = value.as_i64(),
            _ => {
                if !content.apply_prop(key, value) {
                    tracing::debug!(
                        key = %key,
                        block_type = %block.block_type,
                        "ignoring undeclared prop"
                    );
                }
            }
        }
    }

    let container = tree.new_container(attrs, content);
    let mut children = Vec::with_capacity(block.children.len());
    for child in &block.children {
        children.push(container_from_block(tree, child)?);
    }
    tree.attach_children(container, children)?;
    Ok(container)
}

/// Project the whole document
pub fn document_to_blocks(tree: &Tree) -> Result<Vec<Block>> {
    tree.doc_children()
        .iter()
        .map(|c| block_from_container(tree, *c))
        .collect()
}

/// Build a fresh document tree from portable blocks
pub fn blocks_to_document(blocks: &[Block]) -> Result<Tree> {
    let mut tree = Tree::new();
    let mut top = Vec::with_capacity(blocks.len());
    for block in blocks {
        top.push(container_from_block(&mut tree, block)?);
    }
    let root = tree.root();
    tree.insert_into(root, 0, &top)?;
    Ok(tree)
}
