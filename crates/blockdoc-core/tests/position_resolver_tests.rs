use blockdoc_core::ops::projection::blocks_to_document;
use blockdoc_core::{resolve_block, resolve_block_at, Block, BlockDocError};

fn nested_doc() -> Vec<Block> {
    vec![
        Block::paragraph("one").with_id("one"),
        Block::numbered_list_item("two")
            .with_id("two")
            .with_children(vec![
                Block::numbered_list_item("two-a").with_id("two-a"),
                Block::paragraph("two-b").with_id("two-b"),
            ]),
        Block::horizontal_line().with_id("rule"),
    ]
}

#[test]
fn test_no_overlap_no_gaps_within_blocks() {
    // Every position in the document resolves to exactly one container,
    // and positions strictly inside a block's own range resolve to it.
    let tree = blocks_to_document(&nested_doc()).unwrap();
    let len = tree.doc_len();
    assert!(len > 0);

    for pos in 0..len {
        let info = resolve_block_at(&tree, pos).unwrap();
        let (start, end) = info.container_range;
        assert!(pos >= start && pos < end, "position {} escaped its block", pos);
    }
}

#[test]
fn test_interior_positions_resolve_to_named_block() {
    let tree = blocks_to_document(&nested_doc()).unwrap();
    for id in ["one", "two", "two-a", "two-b", "rule"] {
        let info = resolve_block(&tree, id).unwrap();
        // content interior positions always resolve back to this container
        for pos in info.content_range.0..info.content_range.1 {
            let hit = resolve_block_at(&tree, pos).unwrap();
            assert_eq!(hit.container, info.container, "block {} at {}", id, pos);
        }
    }
}

#[test]
fn test_group_reported_for_parent_only() {
    let tree = blocks_to_document(&nested_doc()).unwrap();
    assert!(resolve_block(&tree, "two").unwrap().group.is_some());
    assert!(resolve_block(&tree, "one").unwrap().group.is_none());
    assert!(resolve_block(&tree, "two-a").unwrap().group.is_none());
}

#[test]
fn test_out_of_range_position_is_an_error_not_a_clamp() {
    let tree = blocks_to_document(&nested_doc()).unwrap();
    let len = tree.doc_len();
    assert!(matches!(
        resolve_block_at(&tree, len).unwrap_err(),
        BlockDocError::PositionOutsideBlock { .. }
    ));
    assert!(matches!(
        resolve_block_at(&tree, len + 100).unwrap_err(),
        BlockDocError::PositionOutsideBlock { .. }
    ));
}

#[test]
fn test_resolution_is_pure() {
    let tree = blocks_to_document(&nested_doc()).unwrap();
    let a = resolve_block(&tree, "two-a").unwrap();
    let b = resolve_block(&tree, "two-a").unwrap();
    assert_eq!(a, b);
}
