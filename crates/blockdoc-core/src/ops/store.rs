//! In-memory document store
//!
//! Holds the document tree plus the host-owned selection state (selected
//! block ids and text cursor position). The public methods here are the
//! sanctioned command layer: each commits exactly one edit and runs the
//! consistency engine before returning. Mutating the tree behind them is
//! unsupported.
//!
//! Not thread-safe by design: the editing session owns exactly one mutator
//! at a time, so no locking is needed.

use std::time::Instant;

use crate::commands::Placement;
use crate::engine::{self, EditSource};
use crate::errors::Result;
use crate::model::block::{Block, BlockPatch};
use crate::model::node::Tree;
use crate::ops::{block_ops, projection, text_ops};
use crate::position::{self, BlockInfo};
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) tree: Tree,
    selection: Vec<String>,
    cursor: Option<u64>,
}

impl Store {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from portable blocks
    ///
    /// # Errors
    ///
    /// Returns `Internal` only on arena invariant breaches; malformed
    /// blocks degrade (unknown types become paragraphs, unknown props are
    /// dropped) rather than fail.
    pub fn from_blocks(blocks: &[Block]) -> Result<Self> {
        let mut store = Self {
            tree: projection::blocks_to_document(blocks)?,
            selection: Vec::new(),
            cursor: None,
        };
        // Loading counts as a committed edit: derived attributes are
        // reconciled before the document is handed to the host
        engine::commit(&mut store, EditSource::Command)?;
        Ok(store)
    }

    /// Project the whole document to portable blocks
    pub fn document(&self) -> Vec<Block> {
        projection::document_to_blocks(&self.tree).unwrap_or_default()
    }

    /// Project a single block by id
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when the id does not resolve.
    pub fn get_block(&self, block_id: &str) -> Result<Block> {
        let info = position::resolve_block(&self.tree, block_id)?;
        projection::block_from_container(&self.tree, info.container)
    }

    /// Total document length in raw positions
    pub fn doc_len(&self) -> u64 {
        self.tree.doc_len()
    }

    /// Resolve a block id to its structural description and bounds
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when the id does not resolve.
    pub fn resolve(&self, block_id: &str) -> Result<BlockInfo> {
        position::resolve_block(&self.tree, block_id)
    }

    /// Resolve the block enclosing a raw position
    ///
    /// # Errors
    ///
    /// `PositionOutsideBlock` when the position is not inside any block.
    pub fn resolve_at(&self, position: u64) -> Result<BlockInfo> {
        position::resolve_block_at(&self.tree, position)
    }

    // ===== Selection accessors (state owned by the host editor) =====

    /// Record the host's block selection
    pub fn set_selection(&mut self, block_ids: Vec<String>) {
        self.selection = block_ids;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Record the host's text cursor position
    pub fn set_text_cursor(&mut self, position: Option<u64>) {
        self.cursor = position;
    }

    /// Blocks currently selected, in the order the host reported them
    ///
    /// Ids that no longer resolve (e.g. after a deletion) are skipped.
    pub fn current_selection_blocks(&self) -> Vec<Block> {
        self.selection
            .iter()
            .filter_map(|id| self.get_block(id).ok())
            .collect()
    }

    /// The block containing the text cursor, if any
    pub fn current_cursor_block(&self) -> Option<Block> {
        let info = self.cursor_info()?;
        projection::block_from_container(&self.tree, info.container).ok()
    }

    pub(crate) fn cursor_position(&self) -> Option<u64> {
        self.cursor
    }

    /// Drop selection entries whose blocks no longer exist
    pub(crate) fn prune_stale_selection(&mut self) {
        self.selection.retain(|id| self.tree.find_block(id).is_some());
    }

    pub(crate) fn cursor_info(&self) -> Option<BlockInfo> {
        let pos = self.cursor?;
        position::resolve_block_at(&self.tree, pos).ok()
    }

    // ===== Command layer =====

    /// Insert blocks as siblings of `reference_id`
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when the reference id does not resolve; the
    /// document is unchanged in that case.
    pub fn insert_blocks(
        &mut self,
        blocks: &[Block],
        reference_id: &str,
        placement: Placement,
    ) -> Result<Vec<String>> {
        let started = Instant::now();
        log_op_start!("insert_blocks", block_id = reference_id);
        let result = block_ops::insert_blocks(self, blocks, reference_id, placement)
            .and_then(|ids| {
                engine::commit(self, EditSource::Command)?;
                Ok(ids)
            });
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(ids) => {
                log_op_end!("insert_blocks", duration_ms = duration_ms, block_count = ids.len())
            }
            Err(e) => log_op_error!("insert_blocks", e, duration_ms = duration_ms),
        }
        result
    }

    /// Replace the named blocks with new ones (pure deletion when empty)
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when any id is missing; the document is unchanged
    /// in that case.
    pub fn replace_blocks(&mut self, ids: &[String], blocks: &[Block]) -> Result<Vec<String>> {
        let started = Instant::now();
        log_op_start!("replace_blocks", block_count = ids.len());
        let result = block_ops::replace_blocks(self, ids, blocks).and_then(|new_ids| {
            engine::commit(self, EditSource::Command)?;
            Ok(new_ids)
        });
        if result.is_ok() {
            // Selection entries for removed blocks are stale now
            self.prune_stale_selection();
        }
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(ids) => {
                log_op_end!("replace_blocks", duration_ms = duration_ms, block_count = ids.len())
            }
            Err(e) => log_op_error!("replace_blocks", e, duration_ms = duration_ms),
        }
        result
    }

    /// Merge a patch into one block
    ///
    /// # Errors
    ///
    /// `BlockNotFound` when the id is missing.
    pub fn update_block(&mut self, block_id: &str, patch: &BlockPatch) -> Result<String> {
        let started = Instant::now();
        log_op_start!("update_block", block_id = block_id);
        let result = block_ops::update_block(self, block_id, patch).and_then(|id| {
            engine::commit(self, EditSource::Command)?;
            Ok(id)
        });
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => log_op_end!("update_block", duration_ms = duration_ms),
            Err(e) => log_op_error!("update_block", e, duration_ms = duration_ms),
        }
        result
    }

    /// Insert text at a raw position (interactive typing)
    ///
    /// # Errors
    ///
    /// `PositionOutsideBlock` when the position is not editable.
    pub fn insert_text(&mut self, position: u64, text: &str) -> Result<()> {
        text_ops::insert_text(self, position, text)?;
        engine::commit(self, EditSource::Typing)
    }
}
