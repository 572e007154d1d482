//! Clipboard ingestion pipeline
//!
//! One pass per paste event, terminal on the first matching branch:
//!
//! 1. a cursor inside a code block takes plain text verbatim;
//! 2. format negotiation picks the best available external format;
//! 3. the format branch normalizes its payload into portable blocks;
//! 4. blocks land relative to the current selection or cursor under a
//!    deterministic placement policy.
//!
//! Content-interpretation failures never surface: every branch degrades to
//! inserting the pasted text as plain paragraphs. Worst case is degraded
//! formatting, never loss of the pasted text.

pub mod clipboard;
pub mod files;
pub mod html;
pub mod linkify;
pub mod markdown;
pub mod vscode;

pub use clipboard::{ClipboardFormat, ClipboardPayload, PastedFile, ACCEPTED_FORMATS};

use std::time::Instant;

use blockdoc_core_types::{RequestId, TraceId};

use crate::commands::Placement;
use crate::engine::{self, EditSource};
use crate::errors::Result;
use crate::model::block::Block;
use crate::model::content::BlockContent;
use crate::ops::{block_ops, text_ops, Store};
use crate::{log_op_end, log_op_start};

/// How a paste was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum PasteOutcome {
    /// Blocks were inserted relative to the cursor (or document start)
    Inserted { block_ids: Vec<String> },
    /// Blocks replaced the selection (or an empty cursor block)
    Replaced { block_ids: Vec<String> },
    /// Plain text was inserted verbatim at the cursor (code-block mode)
    InsertedText,
    /// A branch failed and the pasted text landed as plain paragraphs
    PlainTextFallback { block_ids: Vec<String> },
    /// No recognized format was present: a deliberate no-op, still handled
    Ignored,
    /// The paste event carried no usable data at all
    Unhandled,
}

impl PasteOutcome {
    /// The "handled" signal reported to the host
    ///
    /// `false` only when no clipboard data is present; once any branch is
    /// taken the pipeline never defers to default paste behavior.
    pub fn handled(&self) -> bool {
        !matches!(self, PasteOutcome::Unhandled)
    }

    /// Ids of blocks created by this paste, if any
    pub fn block_ids(&self) -> &[String] {
        match self {
            PasteOutcome::Inserted { block_ids }
            | PasteOutcome::Replaced { block_ids }
            | PasteOutcome::PlainTextFallback { block_ids } => block_ids,
            _ => &[],
        }
    }
}

/// Run the ingestion pipeline for one paste event
pub fn handle_paste(store: &mut Store, clipboard: &ClipboardPayload) -> PasteOutcome {
    let started = Instant::now();
    let request_id = RequestId::new();
    // one trace covers the paste and any corrective renumber edit it causes
    let trace_id = TraceId::new();
    log_op_start!("handle_paste", request_id = %request_id, trace_id = %trace_id);

    let outcome = run_pipeline(store, clipboard);

    let duration_ms = started.elapsed().as_millis() as u64;
    log_op_end!(
        "handle_paste",
        duration_ms = duration_ms,
        request_id = %request_id,
        trace_id = %trace_id,
        handled = outcome.handled()
    );
    outcome
}

fn run_pipeline(store: &mut Store, clipboard: &ClipboardPayload) -> PasteOutcome {
    if clipboard.is_empty() {
        return PasteOutcome::Unhandled;
    }

    // Code-block interception: verbatim text only, all other formats ignored
    if let Some(info) = store.cursor_info() {
        if matches!(
            store.tree.content(info.content),
            Ok(BlockContent::CodeBlock { .. })
        ) {
            let text = clipboard
                .text_for(ClipboardFormat::PlainText)
                .filter(|t| !t.is_empty());
            let Some(text) = text else {
                return PasteOutcome::Unhandled;
            };
            let pos = store.cursor_position().unwrap_or_default();
            return match text_ops::insert_text(store, pos, text)
                .and_then(|_| engine::commit(store, EditSource::Paste))
            {
                Ok(()) => PasteOutcome::InsertedText,
                Err(e) => {
                    tracing::warn!(err_code = e.code(), "code-block paste failed");
                    fallback_plain_text(store, text)
                }
            };
        }
    }

    let Some(format) = clipboard.negotiate() else {
        return PasteOutcome::Ignored;
    };

    let branch: Result<Vec<Block>> = match format {
        ClipboardFormat::EditorHtml => {
            // trusted payload, already in the target shape: no normalization
            let data = clipboard.text_for(format).unwrap_or_default();
            html::html_to_blocks(data, false)
        }
        ClipboardFormat::Html => {
            let data = clipboard.text_for(format).unwrap_or_default();
            html::html_to_blocks(data, true)
        }
        ClipboardFormat::VsCodeEditorData => {
            vscode::code_block_from_payload(clipboard).map(|block| vec![block])
        }
        ClipboardFormat::Files => Ok(files::blocks_from_files(clipboard.files())),
        ClipboardFormat::PlainText => {
            let data = clipboard.text_for(format).unwrap_or_default();
            markdown::parse_markdown_to_blocks(&linkify::convert_links_to_markdown(data))
        }
    };

    // What to insert verbatim if the branch cannot deliver blocks
    let fallback_text: String = match format {
        ClipboardFormat::VsCodeEditorData => clipboard
            .text_for(ClipboardFormat::PlainText)
            .unwrap_or_default()
            .to_string(),
        ClipboardFormat::Files => clipboard
            .files()
            .iter()
            .map(|f| f.name.clone())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => clipboard.text_for(format).unwrap_or_default().to_string(),
    };

    match branch {
        Ok(blocks) if !blocks.is_empty() => match place_blocks(store, &blocks) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(err_code = e.code(), "paste insertion failed, degrading");
                fallback_plain_text(store, &fallback_text)
            }
        },
        Ok(_) => fallback_plain_text(store, &fallback_text),
        Err(e) => {
            tracing::warn!(
                err_code = e.code(),
                format = format.mime_type(),
                "paste normalization failed, degrading"
            );
            fallback_plain_text(store, &fallback_text)
        }
    }
}

/// Selection-aware placement policy
///
/// Checked in order: a non-empty block selection is replaced; a cursor
/// block is replaced when empty, otherwise insertion goes after it; with
/// neither, blocks land after the document's first block (or at the end of
/// an empty document).
fn place_blocks(store: &mut Store, blocks: &[Block]) -> Result<PasteOutcome> {
    let selection = store.current_selection_blocks();
    if !selection.is_empty() {
        let ids: Vec<String> = selection.into_iter().filter_map(|b| b.id).collect();
        let block_ids = block_ops::replace_blocks(store, &ids, blocks)?;
        engine::commit(store, EditSource::Paste)?;
        store.prune_stale_selection();
        return Ok(PasteOutcome::Replaced { block_ids });
    }

    if let Some(info) = store.cursor_info() {
        let cursor_id = store.tree.container_parts(info.container)?.0.id.clone();
        let empty = store.tree.content(info.content)?.is_empty();
        if empty {
            let block_ids = block_ops::replace_blocks(store, &[cursor_id], blocks)?;
            engine::commit(store, EditSource::Paste)?;
            return Ok(PasteOutcome::Replaced { block_ids });
        }
        let block_ids = block_ops::insert_blocks(store, blocks, &cursor_id, Placement::After)?;
        engine::commit(store, EditSource::Paste)?;
        return Ok(PasteOutcome::Inserted { block_ids });
    }

    if let Some(first) = store.tree.doc_children().first().copied() {
        let first_id = store.tree.container_parts(first)?.0.id.clone();
        let block_ids = block_ops::insert_blocks(store, blocks, &first_id, Placement::After)?;
        engine::commit(store, EditSource::Paste)?;
        return Ok(PasteOutcome::Inserted { block_ids });
    }

    // empty document: nothing to anchor on, append
    let block_ids = block_ops::append_blocks(store, blocks)?;
    engine::commit(store, EditSource::Paste)?;
    Ok(PasteOutcome::Inserted { block_ids })
}

/// Insert the pasted text as plain content, never failing the paste
fn fallback_plain_text(store: &mut Store, text: &str) -> PasteOutcome {
    if text.is_empty() {
        return PasteOutcome::Ignored;
    }

    if let Some(pos) = store.cursor_position() {
        if text_ops::insert_text(store, pos, text).is_ok() {
            if let Err(e) = engine::commit(store, EditSource::Paste) {
                tracing::warn!(err_code = e.code(), "renumber after fallback paste failed");
            }
            return PasteOutcome::PlainTextFallback {
                block_ids: Vec::new(),
            };
        }
    }

    let blocks: Vec<Block> = text.split('\n').map(Block::paragraph).collect();
    match place_blocks(store, &blocks) {
        Ok(outcome) => PasteOutcome::PlainTextFallback {
            block_ids: outcome.block_ids().to_vec(),
        },
        Err(e) => {
            tracing::warn!(err_code = e.code(), "fallback placement failed, appending");
            match block_ops::append_blocks(store, &blocks)
                .and_then(|ids| {
                    engine::commit(store, EditSource::Paste)?;
                    Ok(ids)
                }) {
                Ok(block_ids) => PasteOutcome::PlainTextFallback { block_ids },
                Err(e) => {
                    tracing::error!(err_code = e.code(), "paste fallback could not insert");
                    PasteOutcome::Ignored
                }
            }
        }
    }
}
