//! blockdoc Core - block-structured rich-text document engine
//!
//! This crate provides the foundational data structures and operations for
//! blockdoc, including:
//! - The block tree model (container / content / group) with stable block ids
//! - Position resolution from raw editable positions to enclosing blocks
//! - Block-granular commands (insert / replace / update) with an atomic
//!   functional-boundary `apply()`
//! - The consistency engine that keeps ordered-list numbering a pure
//!   function of document structure after every committed edit
//! - The clipboard ingestion pipeline normalizing external input (HTML,
//!   Markdown, plain text, files) into blocks under a selection-aware
//!   placement policy

pub mod apply;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod ingest;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod position;

// Re-export commonly used types
pub use apply::apply;
pub use commands::{Command, Placement};
pub use errors::{BlockDocError, Result};
pub use ingest::{handle_paste, ClipboardFormat, ClipboardPayload, PastedFile, PasteOutcome};
pub use model::{Block, BlockContent, BlockPatch, Inline, Styles};
pub use ops::Store;
pub use position::{resolve_block, resolve_block_at, BlockInfo};
