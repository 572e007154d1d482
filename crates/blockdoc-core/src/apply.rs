//! Functional-boundary apply function
//!
//! This module provides the `apply()` function, the canonical entry point
//! for atomic state mutations in the functional-boundary style.
//!
//! ## Atomicity Contract
//!
//! The `apply()` function guarantees:
//! - **All-or-nothing**: Either the entire command succeeds and returns a
//!   valid new state, or it fails and the caller's pre-edit state remains
//!   valid
//! - **No panics**: Invalid input returns typed errors
//! - **Reconciled output**: the consistency engine has run before the new
//!   state is returned, so derived attributes (ordered-list numbering) are
//!   already stable
//!
//! ## Example
//!
//! ```
//! use blockdoc_core::{apply, Block, Command, Placement, Store};
//!
//! let state = Store::from_blocks(&[Block::paragraph("hello").with_id("p1")]).unwrap();
//! let cmd = Command::InsertBlocks {
//!     blocks: vec![Block::paragraph("world")],
//!     reference_id: "p1".to_string(),
//!     placement: Placement::After,
//! };
//!
//! let new_state = apply(state, cmd).unwrap();
//! assert_eq!(new_state.document().len(), 2);
//! ```

use crate::commands::Command;
use crate::errors::Result;
use crate::ops::Store;

/// Apply a command to a store, returning a new store state
///
/// Commands that reference blocks validate every id over the pre-edit tree
/// before mutating, so an `Err` means the document the caller still owns
/// is untouched.
///
/// # Errors
///
/// * `BlockNotFound` - a referenced block id does not resolve
/// * `PositionOutsideBlock` - a text position is not editable
pub fn apply(mut state: Store, cmd: Command) -> Result<Store> {
    match cmd {
        Command::InsertBlocks {
            blocks,
            reference_id,
            placement,
        } => {
            state.insert_blocks(&blocks, &reference_id, placement)?;
            Ok(state)
        }

        Command::ReplaceBlocks { ids, blocks } => {
            state.replace_blocks(&ids, &blocks)?;
            Ok(state)
        }

        Command::UpdateBlock { block_id, patch } => {
            state.update_block(&block_id, &patch)?;
            Ok(state)
        }

        Command::InsertText { position, text } => {
            state.insert_text(position, &text)?;
            Ok(state)
        }
    }
}
