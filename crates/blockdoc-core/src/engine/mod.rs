//! Consistency engine
//!
//! A transaction interceptor invoked once per committed edit, regardless of
//! origin (typing, command layer, paste). It recomputes derived per-block
//! attributes (ordered-list numbering) and, only when something actually
//! changed, commits one corrective follow-up edit tagged so that the
//! interceptor skips it. The tag is carried alongside the edit as an
//! explicit value, not global mutable state.

pub mod numbering;

use crate::errors::Result;
use crate::ops::Store;

/// Origin tag carried by every committed edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSource {
    /// Interactive text input
    Typing,
    /// A command-layer operation
    Command,
    /// The clipboard ingestion pipeline
    Paste,
    /// The consistency engine's own corrective edit
    Renumber,
}

/// Run the consistency pass for an edit committed with `source`
///
/// An edit tagged `Renumber` is the engine's own output and is never
/// re-inspected, which bounds every user edit to at most one follow-up
/// edit, never a chain.
pub fn commit(store: &mut Store, source: EditSource) -> Result<()> {
    if source == EditSource::Renumber {
        return Ok(());
    }

    let updates = numbering::compute_updates(&store.tree)?;
    if updates.is_empty() {
        return Ok(());
    }

    tracing::debug!(update_count = updates.len(), "renumbering list items");
    numbering::apply_updates(&mut store.tree, &updates)?;
    commit(store, EditSource::Renumber)
}
