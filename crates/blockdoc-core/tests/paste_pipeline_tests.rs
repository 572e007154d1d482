mod common;

use blockdoc_core::model::content::plain_text;
use blockdoc_core::{
    handle_paste, Block, ClipboardFormat, ClipboardPayload, PastedFile, PasteOutcome,
};
use common::{cursor_into, doc_types, index_of, store_with};

fn plain(text: &str) -> ClipboardPayload {
    ClipboardPayload::new().with_text(ClipboardFormat::PlainText, text)
}

// ===== HANDLED SIGNAL =====

#[test]
fn test_empty_clipboard_is_unhandled() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    let outcome = handle_paste(&mut store, &ClipboardPayload::new());
    assert_eq!(outcome, PasteOutcome::Unhandled);
    assert!(!outcome.handled());
}

#[test]
fn test_unrecognized_format_is_a_deliberate_noop() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    let payload = ClipboardPayload::new().with_unrecognized("application/x-custom");
    let outcome = handle_paste(&mut store, &payload);
    assert_eq!(outcome, PasteOutcome::Ignored);
    // handled: the pipeline never defers once any data was present
    assert!(outcome.handled());
    assert_eq!(doc_types(&store), vec!["paragraph"]);
}

// ===== CODE-BLOCK INTERCEPTION =====

#[test]
fn test_paste_into_code_block_takes_plain_text_verbatim() {
    let mut store = store_with(&[Block::code_block(
        Some("rust".to_string()),
        "fn main() {",
    )
    .with_id("code")]);
    cursor_into(&mut store, "code");

    // rich formats present, but only text/plain is honored here
    let payload = ClipboardPayload::new()
        .with_text(ClipboardFormat::Html, "<p># not code</p>")
        .with_text(ClipboardFormat::PlainText, "// pasted");
    let outcome = handle_paste(&mut store, &payload);

    assert_eq!(outcome, PasteOutcome::InsertedText);
    let block = store.get_block("code").unwrap();
    assert_eq!(plain_text(&block.content), "// pastedfn main() {");
    // no new blocks were created
    assert_eq!(doc_types(&store), vec!["codeBlock"]);
}

#[test]
fn test_code_block_mode_without_plain_text_is_unhandled() {
    let mut store = store_with(&[Block::code_block(None, "x").with_id("code")]);
    cursor_into(&mut store, "code");

    let payload = ClipboardPayload::new().with_text(ClipboardFormat::Html, "<p>rich</p>");
    assert_eq!(handle_paste(&mut store, &payload), PasteOutcome::Unhandled);
}

// ===== FORMAT PRIORITY =====

#[test]
fn test_editor_html_outranks_plain_text() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    let payload = ClipboardPayload::new()
        .with_text(ClipboardFormat::EditorHtml, "<h1>native</h1>")
        .with_text(ClipboardFormat::PlainText, "plain");
    let outcome = handle_paste(&mut store, &payload);

    assert!(matches!(outcome, PasteOutcome::Inserted { .. }));
    assert_eq!(doc_types(&store), vec!["paragraph", "heading"]);
}

#[test]
fn test_vscode_data_outranks_generic_html() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    let payload = ClipboardPayload::new()
        .with_text(ClipboardFormat::Html, "<p>let x = 1;</p>")
        .with_text(ClipboardFormat::VsCodeEditorData, r#"{"mode":"rust"}"#)
        .with_text(ClipboardFormat::PlainText, "let x = 1;");
    handle_paste(&mut store, &payload);

    let doc = store.document();
    assert_eq!(doc[1].block_type, "codeBlock");
    assert_eq!(doc[1].props["language"], "rust");
    assert_eq!(plain_text(&doc[1].content), "let x = 1;");
}

#[test]
fn test_files_insert_image_blocks() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    let payload = ClipboardPayload::new().with_files(vec![PastedFile {
        name: "shot.png".to_string(),
        mime_type: "image/png".to_string(),
        url: "blob:shot".to_string(),
    }]);
    let outcome = handle_paste(&mut store, &payload);

    assert!(matches!(outcome, PasteOutcome::Inserted { .. }));
    let doc = store.document();
    assert_eq!(doc[1].block_type, "image");
    assert_eq!(doc[1].props["url"], "blob:shot");
}

// ===== PLAIN TEXT: LINKIFY + MARKDOWN =====

#[test]
fn test_url_line_pastes_as_link_paragraph() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    handle_paste(&mut store, &plain("https://example.com"));

    let doc = store.document();
    assert_eq!(doc[1].block_type, "paragraph");
    assert_eq!(
        doc[1].content,
        vec![blockdoc_core::Inline::link(
            "https://example.com",
            "https://example.com"
        )]
    );
}

#[test]
fn test_image_url_line_pastes_as_image_block() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    handle_paste(&mut store, &plain("https://example.com/pic.png"));

    let doc = store.document();
    assert_eq!(doc[1].block_type, "image");
    assert_eq!(doc[1].props["url"], "https://example.com/pic.png");
}

#[test]
fn test_mixed_url_line_stays_plain() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    let text = "see https://example.com/pic.png and https://example.com";
    handle_paste(&mut store, &plain(text));

    let doc = store.document();
    assert_eq!(doc[1].block_type, "paragraph");
    assert_eq!(plain_text(&doc[1].content), text);
}

#[test]
fn test_markdown_paste_builds_blocks_and_numbering() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    handle_paste(&mut store, &plain("# Title\n\n1. one\n2. two"));

    let doc = store.document();
    assert_eq!(
        doc_types(&store),
        vec!["paragraph", "heading", "numberedListItem", "numberedListItem"]
    );
    // the consistency engine numbered the pasted items
    let n1 = doc[2].id.clone().unwrap();
    let n2 = doc[3].id.clone().unwrap();
    assert_eq!(index_of(&store, &n1), "1");
    assert_eq!(index_of(&store, &n2), "2");
}

// ===== PLACEMENT POLICY =====

#[test]
fn test_selection_is_replaced_exactly() {
    let mut store = store_with(&[
        Block::paragraph("keep-head").with_id("a"),
        Block::paragraph("sel1").with_id("b"),
        Block::paragraph("sel2").with_id("c"),
        Block::paragraph("keep-tail").with_id("d"),
    ]);
    store.set_selection(vec!["b".to_string(), "c".to_string()]);

    let outcome = handle_paste(&mut store, &plain("# Pasted"));

    assert!(matches!(outcome, PasteOutcome::Replaced { .. }));
    let doc = store.document();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc[0].id.as_deref(), Some("a"));
    assert_eq!(doc[1].block_type, "heading");
    assert_eq!(doc[2].id.as_deref(), Some("d"));
}

#[test]
fn test_empty_cursor_block_is_replaced() {
    let mut store = store_with(&[
        Block::paragraph("full").with_id("a"),
        Block::paragraph("").with_id("empty"),
    ]);
    cursor_into(&mut store, "empty");

    let outcome = handle_paste(&mut store, &plain("pasted"));

    assert!(matches!(outcome, PasteOutcome::Replaced { .. }));
    let doc = store.document();
    assert_eq!(doc.len(), 2);
    assert!(store.get_block("empty").is_err());
    assert_eq!(plain_text(&doc[1].content), "pasted");
}

#[test]
fn test_non_empty_cursor_block_gets_insert_after() {
    let mut store = store_with(&[
        Block::paragraph("first").with_id("a"),
        Block::paragraph("second").with_id("b"),
    ]);
    cursor_into(&mut store, "a");

    handle_paste(&mut store, &plain("pasted"));

    let doc = store.document();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc[0].id.as_deref(), Some("a"));
    assert_eq!(plain_text(&doc[1].content), "pasted");
    assert_eq!(doc[2].id.as_deref(), Some("b"));
}

#[test]
fn test_no_cursor_defaults_to_after_first_block() {
    let mut store = store_with(&[
        Block::paragraph("first").with_id("a"),
        Block::paragraph("second").with_id("b"),
    ]);

    handle_paste(&mut store, &plain("pasted"));

    let doc = store.document();
    assert_eq!(doc[0].id.as_deref(), Some("a"));
    assert_eq!(plain_text(&doc[1].content), "pasted");
}

#[test]
fn test_empty_document_appends() {
    let mut store = blockdoc_core::Store::new();
    let outcome = handle_paste(&mut store, &plain("pasted"));
    assert!(outcome.handled());
    assert_eq!(doc_types(&store), vec!["paragraph"]);
}

// ===== HTML BRANCH =====

#[test]
fn test_generic_html_gets_nested_list_normalization() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    // the nested list arrives as a sibling of its logical parent <li>
    let html = "<ol><li>one</li><ol><li>inner</li></ol><li>two</li></ol>";
    let payload = ClipboardPayload::new().with_text(ClipboardFormat::Html, html);
    handle_paste(&mut store, &payload);

    let doc = store.document();
    assert_eq!(doc[1].block_type, "numberedListItem");
    assert_eq!(doc[1].children.len(), 1);
    // numbering styles applied per level after the paste commit
    let inner_id = doc[1].children[0].id.clone().unwrap();
    assert_eq!(index_of(&store, &inner_id), "a");
    let two_id = doc[2].id.clone().unwrap();
    assert_eq!(index_of(&store, &two_id), "2");
}

// ===== DEGRADATION =====

#[test]
fn test_malformed_vscode_metadata_degrades_to_plain_text() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    let payload = ClipboardPayload::new()
        .with_text(ClipboardFormat::VsCodeEditorData, "{broken json")
        .with_text(ClipboardFormat::PlainText, "the code");
    let outcome = handle_paste(&mut store, &payload);

    // the pasted text is preserved, inserted at the cursor
    assert!(matches!(outcome, PasteOutcome::PlainTextFallback { .. }));
    assert!(outcome.handled());
    let block = store.get_block("a").unwrap();
    assert_eq!(plain_text(&block.content), "the codea");
}

#[test]
fn test_whitespace_only_plain_text_falls_back_without_block_spam() {
    let mut store = store_with(&[Block::paragraph("a").with_id("a")]);
    cursor_into(&mut store, "a");

    // markdown parsing yields no blocks; the raw text is inserted instead
    let outcome = handle_paste(&mut store, &plain("   "));
    assert!(matches!(outcome, PasteOutcome::PlainTextFallback { .. }));
    let block = store.get_block("a").unwrap();
    assert_eq!(plain_text(&block.content), "   a");
}
