//! Shared helpers for integration tests

use blockdoc_core::{Block, Store};

#[allow(dead_code)]
pub fn store_with(blocks: &[Block]) -> Store {
    Store::from_blocks(blocks).expect("building store from blocks")
}

/// Block types of the top-level document, in order
#[allow(dead_code)]
pub fn doc_types(store: &Store) -> Vec<String> {
    store
        .document()
        .iter()
        .map(|b| b.block_type.clone())
        .collect()
}

/// Top-level block ids, in order
#[allow(dead_code)]
pub fn doc_ids(store: &Store) -> Vec<String> {
    store
        .document()
        .iter()
        .map(|b| b.id.clone().expect("projected block has id"))
        .collect()
}

/// Stored list index of the named block
#[allow(dead_code)]
pub fn index_of(store: &Store, block_id: &str) -> String {
    let block = store.get_block(block_id).expect("block exists");
    block.props["index"]
        .as_str()
        .expect("index is a string")
        .to_string()
}

/// Place the text cursor just inside the named block's content
#[allow(dead_code)]
pub fn cursor_into(store: &mut Store, block_id: &str) {
    let info = store.resolve(block_id).expect("block exists");
    let pos = info.content_interior_start();
    store.set_text_cursor(Some(pos));
}
