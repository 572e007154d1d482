//! Code-editor clipboard handler
//!
//! `vscode-editor-data` carries JSON metadata describing the copied text
//! (notably the language `mode`); the text itself travels in the plain-text
//! entry. The handler reconstructs a code block from the pair.

use serde::Deserialize;

use crate::errors::{BlockDocError, Result};
use crate::ingest::clipboard::{ClipboardFormat, ClipboardPayload};
use crate::model::block::Block;

#[derive(Debug, Deserialize)]
struct EditorClipboardMeta {
    #[serde(default)]
    mode: Option<String>,
}

/// Rebuild a code block from code-editor clipboard data
///
/// # Errors
///
/// `ParseFailure` when the metadata entry is not valid JSON; the pipeline
/// recovers by falling back to plain text.
pub(crate) fn code_block_from_payload(clipboard: &ClipboardPayload) -> Result<Block> {
    let raw = clipboard
        .text_for(ClipboardFormat::VsCodeEditorData)
        .unwrap_or("{}");
    let meta: EditorClipboardMeta =
        serde_json::from_str(raw).map_err(|e| BlockDocError::ParseFailure {
            format: ClipboardFormat::VsCodeEditorData.mime_type().to_string(),
            message: e.to_string(),
        })?;
    let text = clipboard
        .text_for(ClipboardFormat::PlainText)
        .unwrap_or_default();
    Ok(Block::code_block(meta.mode, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_carries_language_and_text() {
        let clipboard = ClipboardPayload::new()
            .with_text(ClipboardFormat::VsCodeEditorData, r#"{"mode": "rust"}"#)
            .with_text(ClipboardFormat::PlainText, "fn main() {}");
        let block = code_block_from_payload(&clipboard).unwrap();
        assert_eq!(block.block_type, "codeBlock");
        assert_eq!(block.props["language"], "rust");
    }

    #[test]
    fn test_malformed_metadata_is_parse_failure() {
        let clipboard = ClipboardPayload::new()
            .with_text(ClipboardFormat::VsCodeEditorData, "{oops")
            .with_text(ClipboardFormat::PlainText, "x");
        let err = code_block_from_payload(&clipboard).unwrap_err();
        assert!(matches!(err, BlockDocError::ParseFailure { .. }));
    }
}
