//! Command types for block-granular operations
//!
//! This module defines the command inventory processed by the `apply()`
//! function. Every structural mutation of a document is expressible as one
//! of these commands.

use crate::model::block::{Block, BlockPatch};

/// Where to place inserted blocks relative to the reference block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Command enum representing all block operations
///
/// Commands are processed by the `apply()` function, which takes ownership
/// of the current state, executes the command, and returns a new valid
/// state with derived attributes already reconciled.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert blocks as siblings of a reference block
    InsertBlocks {
        blocks: Vec<Block>,
        reference_id: String,
        placement: Placement,
    },

    /// Replace a set of blocks (pure deletion when `blocks` is empty)
    ReplaceBlocks { ids: Vec<String>, blocks: Vec<Block> },

    /// Merge a partial patch into one block
    UpdateBlock {
        block_id: String,
        patch: BlockPatch,
    },

    /// Insert text at a raw position (interactive typing)
    InsertText { position: u64, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_insert_blocks() {
        let cmd = Command::InsertBlocks {
            blocks: vec![Block::paragraph("x")],
            reference_id: "b1".to_string(),
            placement: Placement::After,
        };

        match cmd {
            Command::InsertBlocks { reference_id, .. } => {
                assert_eq!(reference_id, "b1");
            }
            _ => panic!("Wrong command variant"),
        }
    }

    #[test]
    fn test_command_clone() {
        let cmd1 = Command::UpdateBlock {
            block_id: "b1".to_string(),
            patch: BlockPatch::new().with_prop("color", "red"),
        };

        let cmd2 = cmd1.clone();
        assert_eq!(cmd1, cmd2);
    }
}
