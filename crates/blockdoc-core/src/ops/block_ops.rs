//! Block-granular raw edits
//!
//! These functions perform the structural work of the command layer: each
//! validates every referenced block id over the pre-edit tree before
//! mutating anything, so a failure leaves the document untouched. They do
//! not run the consistency engine; the committing wrappers on `Store` do.

use std::collections::HashSet;

use crate::commands::Placement;
use crate::errors::Result;
use crate::model::block::{Block, BlockPatch};
use crate::model::node::NodeId;
use crate::ops::{projection, store::Store};
use crate::position;

fn block_ids_of(store: &Store, containers: &[NodeId]) -> Result<Vec<String>> {
    containers
        .iter()
        .map(|c| Ok(store.tree.container_parts(*c)?.0.id.clone()))
        .collect()
}

/// Splice blocks in as siblings of `reference_id`
///
/// # Errors
///
/// `BlockNotFound` when `reference_id` does not resolve.
pub(crate) fn insert_blocks(
    store: &mut Store,
    blocks: &[Block],
    reference_id: &str,
    placement: Placement,
) -> Result<Vec<String>> {
    let info = position::resolve_block(&store.tree, reference_id)?;
    let (parent, index) = store.tree.index_in_parent(info.container)?;
    let at = match placement {
        Placement::Before => index,
        Placement::After => index + 1,
    };

    let mut built = Vec::with_capacity(blocks.len());
    for block in blocks {
        built.push(projection::container_from_block(&mut store.tree, block)?);
    }
    store.tree.insert_into(parent, at, &built)?;
    block_ids_of(store, &built)
}

/// Append blocks at the end of the document
///
/// Last-resort insertion used by the ingestion pipeline when no reference
/// block exists (empty document).
pub(crate) fn append_blocks(store: &mut Store, blocks: &[Block]) -> Result<Vec<String>> {
    let mut built = Vec::with_capacity(blocks.len());
    for block in blocks {
        built.push(projection::container_from_block(&mut store.tree, block)?);
    }
    let root = store.tree.root();
    let end = store.tree.doc_children().len();
    store.tree.insert_into(root, end, &built)?;
    block_ids_of(store, &built)
}

/// Remove the named blocks and splice `blocks` in their place
///
/// The replacement lands at the position of the first removed block in
/// document order; surrounding sibling order is preserved. An empty
/// `blocks` is a pure deletion. A group emptied by the removal is pruned.
///
/// # Errors
///
/// `BlockNotFound` when any id is missing; nothing is mutated in that case.
pub(crate) fn replace_blocks(
    store: &mut Store,
    ids: &[String],
    blocks: &[Block],
) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // Validate every id before touching the tree
    let mut set: HashSet<NodeId> = HashSet::with_capacity(ids.len());
    for id in ids {
        set.insert(position::resolve_block(&store.tree, id)?.container);
    }

    let targeted: Vec<NodeId> = store
        .tree
        .containers_in_document_order()
        .into_iter()
        .filter(|n| set.contains(n))
        .collect();

    // The first target in document order has no targeted ancestor, so its
    // parent survives every removal and anchors the replacement.
    let (anchor_parent, anchor_index) = store.tree.index_in_parent(targeted[0])?;
    for node in &targeted {
        // A target nested under an earlier target is already gone
        if store.tree.contains(*node) {
            store.tree.remove_container(*node)?;
        }
    }

    let mut new_ids = Vec::new();
    if !blocks.is_empty() {
        let mut built = Vec::with_capacity(blocks.len());
        for block in blocks {
            built.push(projection::container_from_block(&mut store.tree, block)?);
        }
        store.tree.insert_into(anchor_parent, anchor_index, &built)?;
        new_ids = block_ids_of(store, &built)?;
    }
    store.tree.prune_empty_groups()?;
    Ok(new_ids)
}

/// Merge a patch into one block
///
/// A differing `type` swaps the content node in place, keeping the
/// container id and any nested children. Props merge key-by-key: declared
/// keys update, unset keys stay untouched, undeclared keys are ignored.
///
/// # Errors
///
/// `BlockNotFound` when `block_id` is missing.
pub(crate) fn update_block(store: &mut Store, block_id: &str, patch: &BlockPatch) -> Result<String> {
    let info = position::resolve_block(&store.tree, block_id)?;

    // Swap the type first so props target the new content node
    if let Some(target_type) = &patch.block_type {
        let current = store.tree.content(info.content)?;
        if current.type_name() != target_type {
            let converted = current.convert_to(target_type);
            store.tree.replace_content(info.container, converted)?;
        }
    }

    for (key, value) in &patch.props {
        match key.as_str() {
            "alias" => {
                store.tree.container_attrs_mut(info.container)?.alias =
                    value.as_str().map(str::to_string);
            }
            "color" => {
                store.tree.container_attrs_mut(info.container)?.color =
                    value.as_str().map(str::to_string);
            }
            "style" => {
                store.tree.container_attrs_mut(info.container)?.style =
                    value.as_str().map(str::to_string);
            }
            _ => {
                if !store.tree.content_mut(info.content)?.apply_prop(key, value) {
                    tracing::debug!(
                        key = %key,
                        block_id = %block_id,
                        "ignoring undeclared prop in patch"
                    );
                }
            }
        }
    }
    Ok(block_id.to_string())
}
