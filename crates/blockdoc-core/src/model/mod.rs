//! Document model: node arena, typed block content, portable blocks

pub mod block;
pub mod content;
pub mod node;

pub use block::{Block, BlockPatch};
pub use content::{BlockContent, Inline, Styles};
pub use node::{ContainerAttrs, Node, NodeId, NodeKind, Tree};
