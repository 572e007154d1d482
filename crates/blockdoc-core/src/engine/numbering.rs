//! Ordered-list numbering
//!
//! After this pass, every numbered-list item's index is a pure function of
//! document structure: its position in the run of consecutive numbered
//! siblings, and its nesting level. `level mod 3` selects the numbering
//! style: numeric, alphabetic (wrapping after 26 with no carry), or lower
//! roman (cycling every 15).
//!
//! An item whose previous sibling is not a numbered-list item restarts at
//! 1, even if its own stored index was higher. That is explicit policy, not
//! an accident of implementation.

use std::collections::HashMap;

use crate::errors::Result;
use crate::model::content::BlockContent;
use crate::model::node::{NodeId, Tree};

const ROMAN_NUMERALS: [&str; 15] = [
    "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv", "xv",
];

/// Numbering style for one nesting level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingStyle {
    Numeric,
    Alpha,
    Roman,
}

/// Style for a nesting level: cyclic numeric → alpha → roman
pub fn style_for_level(level: usize) -> NumberingStyle {
    match level % 3 {
        0 => NumberingStyle::Numeric,
        1 => NumberingStyle::Alpha,
        _ => NumberingStyle::Roman,
    }
}

fn number_to_alpha(num: u32) -> String {
    if num == 0 {
        return "a".to_string();
    }
    // wrap after 26 by restarting at 'a', no carry
    let wrapped = (num - 1) % 26;
    char::from(b'a' + wrapped as u8).to_string()
}

fn number_to_roman(num: u32) -> String {
    if num == 0 {
        return "i".to_string();
    }
    // cycle every 15
    ROMAN_NUMERALS[((num - 1) % 15) as usize].to_string()
}

/// Format a counter value under the given style
pub fn format_number(num: u32, style: NumberingStyle) -> String {
    match style {
        NumberingStyle::Numeric => num.to_string(),
        NumberingStyle::Alpha => number_to_alpha(num),
        NumberingStyle::Roman => number_to_roman(num),
    }
}

fn alpha_to_number(alpha: &str) -> u32 {
    match alpha.bytes().next() {
        Some(b) if alpha.len() == 1 && b.is_ascii_lowercase() => (b - b'a') as u32 + 1,
        _ => 1,
    }
}

fn roman_to_number(roman: &str) -> u32 {
    ROMAN_NUMERALS
        .iter()
        .position(|r| *r == roman)
        .map(|i| i as u32 + 1)
        .unwrap_or(1)
}

/// Parse a stored index back to its counter value
///
/// Accepts all three styles in precedence order (digits, then roman
/// numerals up to xv case-insensitively, then a single lowercase letter)
/// and defaults to 1 on anything unrecognized or malformed, so a corrupt
/// index can never fail a renumbering pass.
pub fn number_value(index: &str) -> u32 {
    if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
        return index.parse().unwrap_or(1);
    }

    // Roman wins over alpha for the ambiguous single letters (i, v, x)
    let lower = index.to_lowercase();
    if ROMAN_NUMERALS.contains(&lower.as_str()) {
        return roman_to_number(&lower);
    }

    if index.len() == 1 {
        return alpha_to_number(index);
    }

    1
}

/// One staged index correction
#[derive(Debug, Clone, PartialEq)]
pub struct IndexUpdate {
    pub content: NodeId,
    pub index: String,
}

/// Compute the index corrections that make numbering consistent
///
/// Single depth-first pass over the tree. While walking, the effective
/// index of every numbered item seen so far is staged, so an item after a
/// corrected sibling increments the corrected value and one pass always
/// converges.
pub fn compute_updates(tree: &Tree) -> Result<Vec<IndexUpdate>> {
    let mut staged: HashMap<NodeId, String> = HashMap::new();
    let mut out = Vec::new();
    walk(tree, tree.doc_children(), 0, &mut staged, &mut out)?;
    Ok(out)
}

fn walk(
    tree: &Tree,
    children: &[NodeId],
    numbered_ancestors: usize,
    staged: &mut HashMap<NodeId, String>,
    out: &mut Vec<IndexUpdate>,
) -> Result<()> {
    // Content node of the previous sibling, when it is a numbered item
    let mut prev_numbered: Option<NodeId> = None;

    for &container in children {
        let (_, content_id, group) = tree.container_parts(container)?;
        let content = tree.content(content_id)?;
        let is_numbered = matches!(content, BlockContent::NumberedListItem { .. });

        if let BlockContent::NumberedListItem { index, .. } = content {
            let style = style_for_level(numbered_ancestors);
            let counter = match prev_numbered {
                Some(prev) => staged
                    .get(&prev)
                    .map(|s| number_value(s))
                    .unwrap_or(1)
                    .saturating_add(1),
                None => 1,
            };
            let new_index = format_number(counter, style);
            staged.insert(content_id, new_index.clone());
            if *index != new_index {
                out.push(IndexUpdate {
                    content: content_id,
                    index: new_index,
                });
            }
        }

        if let Some(group) = group {
            let child_level = numbered_ancestors + usize::from(is_numbered);
            walk(tree, tree.children_of(group)?, child_level, staged, out)?;
        }

        prev_numbered = if is_numbered { Some(content_id) } else { None };
    }
    Ok(())
}

/// Apply staged corrections to the tree
pub fn apply_updates(tree: &mut Tree, updates: &[IndexUpdate]) -> Result<()> {
    for update in updates {
        if let BlockContent::NumberedListItem { index, .. } = tree.content_mut(update.content)? {
            *index = update.index.clone();
        }
    }
    Ok(())
}
