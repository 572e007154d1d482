//! Portable block representation
//!
//! `Block` is the unit exchanged with collaborators: serialization and
//! storage, UI rendering, and the ingestion pipeline's parser output. It is
//! derived by flattening a block container's content and children into a
//! stable JSON shape, and converting back is content-preserving for every
//! externally visible attribute.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::content::Inline;

/// A logical block: `{id, type, props, content, children}`
///
/// `id` is `None` only on blocks built for insertion; the command layer
/// assigns a fresh id in that case. Blocks projected out of a document
/// always carry their id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Inline>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            id: None,
            block_type: block_type.into(),
            props: BTreeMap::new(),
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut block = Block::new("paragraph");
        if !text.is_empty() {
            block.content.push(Inline::text(text));
        }
        block
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        let mut block = Block::paragraph(text);
        block.block_type = "heading".to_string();
        block.props.insert("level".to_string(), Value::from(level));
        block
    }

    pub fn bullet_list_item(text: impl Into<String>) -> Self {
        let mut block = Block::paragraph(text);
        block.block_type = "bulletListItem".to_string();
        block
    }

    pub fn numbered_list_item(text: impl Into<String>) -> Self {
        let mut block = Block::paragraph(text);
        block.block_type = "numberedListItem".to_string();
        block
    }

    pub fn code_block(language: Option<String>, text: impl Into<String>) -> Self {
        let mut block = Block::paragraph(text);
        block.block_type = "codeBlock".to_string();
        if let Some(language) = language {
            block
                .props
                .insert("language".to_string(), Value::from(language));
        }
        block
    }

    pub fn horizontal_line() -> Self {
        Block::new("horizontalLine")
    }

    pub fn image(url: impl Into<String>) -> Self {
        let mut block = Block::new("image");
        block
            .props
            .insert("url".to_string(), Value::from(url.into()));
        block
    }

    /// Builder: set an explicit id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add child blocks
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Builder: set a prop
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// Partial update for one block
///
/// Only the fields present are touched: props merge key-by-key into the
/// block's declared attributes, and a differing `type` swaps the content
/// node while keeping the container id and children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
}

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, block_type: impl Into<String>) -> Self {
        self.block_type = Some(block_type.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_serializes_with_type_key() {
        let block = Block::heading(2, "Title").with_id("b1");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["id"], "b1");
        assert_eq!(json["props"]["level"], 2);
        assert_eq!(json["content"][0]["type"], "text");
    }

    #[test]
    fn test_block_without_id_omits_field() {
        let block = Block::paragraph("x");
        let json = serde_json::to_value(&block).unwrap();
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_block_deserializes_without_optional_fields() {
        let block: Block = serde_json::from_str(r#"{"type": "paragraph"}"#).unwrap();
        assert_eq!(block.block_type, "paragraph");
        assert!(block.id.is_none());
        assert!(block.content.is_empty());
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_patch_round_trip() {
        let patch = BlockPatch::new().with_type("heading").with_prop("level", 3);
        let json = serde_json::to_string(&patch).unwrap();
        let back: BlockPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(patch, back);
    }
}
