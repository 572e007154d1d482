//! Raw text insertion
//!
//! Interactive typing and the code-block paste interception both land
//! here: text is inserted at a resolved raw position inside a block's
//! content node.

use crate::errors::{BlockDocError, Result};
use crate::model::content::{BlockContent, Inline};
use crate::ops::store::Store;
use crate::position;

fn insert_str_at_char(target: &mut String, char_offset: usize, text: &str) {
    let byte_offset = target
        .char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(target.len());
    target.insert_str(byte_offset, text);
}

fn insert_into_runs(runs: &mut Vec<Inline>, offset: usize, text: &str) {
    if runs.is_empty() {
        runs.push(Inline::text(text));
        return;
    }
    let mut remaining = offset;
    for run in runs.iter_mut() {
        let len = run.len() as usize;
        if remaining <= len {
            match run {
                Inline::Text { text: target, .. } => insert_str_at_char(target, remaining, text),
                Inline::Link { text: target, .. } => insert_str_at_char(target, remaining, text),
            }
            return;
        }
        remaining -= len;
    }
    runs.push(Inline::text(text));
}

/// Insert text at a raw document position
///
/// # Errors
///
/// `PositionOutsideBlock` when the position is not inside the editable
/// interior of a text-bearing content node.
pub(crate) fn insert_text(store: &mut Store, pos: u64, text: &str) -> Result<()> {
    let info = position::resolve_block_at(&store.tree, pos)?;
    if pos < info.content_interior_start() || pos > info.content_interior_end() {
        return Err(BlockDocError::PositionOutsideBlock { position: pos });
    }
    let offset = (pos - info.content_interior_start()) as usize;

    match store.tree.content_mut(info.content)? {
        BlockContent::CodeBlock { text: body, .. } => {
            insert_str_at_char(body, offset, text);
            Ok(())
        }
        BlockContent::HorizontalRule | BlockContent::Image { .. } => {
            Err(BlockDocError::PositionOutsideBlock { position: pos })
        }
        content => {
            // inline-bearing kinds
            if let Some(runs) = content.inline_mut() {
                insert_into_runs(runs, offset, text);
                Ok(())
            } else {
                Err(BlockDocError::PositionOutsideBlock { position: pos })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_into_empty_runs() {
        let mut runs = Vec::new();
        insert_into_runs(&mut runs, 0, "hi");
        assert_eq!(runs, vec![Inline::text("hi")]);
    }

    #[test]
    fn test_insert_mid_run() {
        let mut runs = vec![Inline::text("abcd")];
        insert_into_runs(&mut runs, 2, "XY");
        assert_eq!(runs, vec![Inline::text("abXYcd")]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut runs = vec![Inline::text("ab")];
        insert_into_runs(&mut runs, 9, "cd");
        assert_eq!(runs, vec![Inline::text("ab"), Inline::text("cd")]);
    }

    #[test]
    fn test_insert_respects_char_boundaries() {
        let mut runs = vec![Inline::text("héllo")];
        insert_into_runs(&mut runs, 2, "X");
        assert_eq!(runs, vec![Inline::text("héXllo")]);
    }
}
