//! Typed block content and inline runs
//!
//! Every block type declares a closed attribute set. Unknown attributes
//! arriving through a patch or an imported document are ignored (and logged
//! at debug level), never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character styles on a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Styles {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,
}

impl Styles {
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.code
    }
}

/// One run of inline content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Styles::is_plain")]
        styles: Styles,
    },
    Link {
        href: String,
        text: String,
    },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            styles: Styles::default(),
        }
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        Inline::Text {
            text: text.into(),
            styles,
        }
    }

    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Inline::Link {
            href: href.into(),
            text: text.into(),
        }
    }

    /// Length of this run in characters
    pub fn len(&self) -> u64 {
        match self {
            Inline::Text { text, .. } => text.chars().count() as u64,
            Inline::Link { text, .. } => text.chars().count() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concatenated plain text of a run sequence
pub fn plain_text(inline: &[Inline]) -> String {
    let mut out = String::new();
    for run in inline {
        match run {
            Inline::Text { text, .. } => out.push_str(text),
            Inline::Link { text, .. } => out.push_str(text),
        }
    }
    out
}

/// The content node of a block container
///
/// A closed tagged enum: one variant per block type, each carrying exactly
/// the attributes that type declares.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph {
        inline: Vec<Inline>,
    },
    Heading {
        level: u8,
        inline: Vec<Inline>,
    },
    BulletListItem {
        inline: Vec<Inline>,
    },
    /// Numbered list item; `index` is maintained by the consistency engine
    /// and is numeric, a single lowercase letter, or a lowercase roman
    /// numeral depending on nesting level
    NumberedListItem {
        index: String,
        inline: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    HorizontalRule,
    Image {
        url: String,
        caption: Option<String>,
    },
}

impl BlockContent {
    /// The external type name of this content
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockContent::Paragraph { .. } => "paragraph",
            BlockContent::Heading { .. } => "heading",
            BlockContent::BulletListItem { .. } => "bulletListItem",
            BlockContent::NumberedListItem { .. } => "numberedListItem",
            BlockContent::CodeBlock { .. } => "codeBlock",
            BlockContent::HorizontalRule => "horizontalLine",
            BlockContent::Image { .. } => "image",
        }
    }

    /// Build content of the named type around the given inline runs
    ///
    /// Unknown type names fall back to a paragraph so that imported
    /// documents degrade in formatting rather than fail.
    pub fn from_type(block_type: &str, inline: Vec<Inline>) -> BlockContent {
        match block_type {
            "paragraph" => BlockContent::Paragraph { inline },
            "heading" => BlockContent::Heading { level: 1, inline },
            "bulletListItem" => BlockContent::BulletListItem { inline },
            "numberedListItem" => BlockContent::NumberedListItem {
                index: "1".to_string(),
                inline,
            },
            "codeBlock" => BlockContent::CodeBlock {
                language: None,
                text: plain_text(&inline),
            },
            "horizontalLine" => BlockContent::HorizontalRule,
            "image" => BlockContent::Image {
                url: String::new(),
                caption: None,
            },
            other => {
                tracing::debug!(block_type = other, "unknown block type, using paragraph");
                BlockContent::Paragraph { inline }
            }
        }
    }

    /// Rebuild this content as the named type, carrying inline text across
    /// where the target type holds inline content
    pub fn convert_to(&self, block_type: &str) -> BlockContent {
        let inline = match self.inline() {
            Some(runs) => runs.to_vec(),
            None => match self {
                BlockContent::CodeBlock { text, .. } if !text.is_empty() => {
                    vec![Inline::text(text.clone())]
                }
                _ => Vec::new(),
            },
        };
        BlockContent::from_type(block_type, inline)
    }

    /// The inline runs of this content, if it is an inline-bearing type
    pub fn inline(&self) -> Option<&[Inline]> {
        match self {
            BlockContent::Paragraph { inline }
            | BlockContent::Heading { inline, .. }
            | BlockContent::BulletListItem { inline }
            | BlockContent::NumberedListItem { inline, .. } => Some(inline),
            _ => None,
        }
    }

    pub fn inline_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            BlockContent::Paragraph { inline }
            | BlockContent::Heading { inline, .. }
            | BlockContent::BulletListItem { inline }
            | BlockContent::NumberedListItem { inline, .. } => Some(inline),
            _ => None,
        }
    }

    /// Length of the editable interior in characters
    pub fn inline_len(&self) -> u64 {
        match self {
            BlockContent::CodeBlock { text, .. } => text.chars().count() as u64,
            BlockContent::HorizontalRule | BlockContent::Image { .. } => 0,
            _ => self
                .inline()
                .map(|runs| runs.iter().map(Inline::len).sum())
                .unwrap_or(0),
        }
    }

    /// Whether this content counts as empty for paste placement
    ///
    /// Only text-bearing types can be empty; a horizontal rule or an image
    /// is never "empty" and is never silently replaced by a paste.
    pub fn is_empty(&self) -> bool {
        match self {
            BlockContent::CodeBlock { text, .. } => text.is_empty(),
            BlockContent::HorizontalRule | BlockContent::Image { .. } => false,
            _ => self
                .inline()
                .map(|runs| runs.iter().all(Inline::is_empty))
                .unwrap_or(false),
        }
    }

    /// The declared attributes of this content as a props map
    pub fn props(&self) -> BTreeMap<String, Value> {
        let mut props = BTreeMap::new();
        match self {
            BlockContent::Heading { level, .. } => {
                props.insert("level".to_string(), Value::from(*level));
            }
            BlockContent::NumberedListItem { index, .. } => {
                props.insert("index".to_string(), Value::from(index.clone()));
            }
            BlockContent::CodeBlock { language, .. } => {
                if let Some(language) = language {
                    props.insert("language".to_string(), Value::from(language.clone()));
                }
            }
            BlockContent::Image { url, caption } => {
                props.insert("url".to_string(), Value::from(url.clone()));
                if let Some(caption) = caption {
                    props.insert("caption".to_string(), Value::from(caption.clone()));
                }
            }
            _ => {}
        }
        props
    }

    /// Apply one declared attribute; returns false if this type does not
    /// declare `key` (the caller decides how to report it)
    pub fn apply_prop(&mut self, key: &str, value: &Value) -> bool {
        match (&mut *self, key) {
            (BlockContent::Heading { level, .. }, "level") => {
                if let Some(n) = value.as_u64() {
                    *level = n.clamp(1, 6) as u8;
                }
                true
            }
            (BlockContent::NumberedListItem { index, .. }, "index") => {
                if let Some(s) = value.as_str() {
                    *index = s.to_string();
                }
                true
            }
            (BlockContent::CodeBlock { language, .. }, "language") => {
                *language = value.as_str().map(|s| s.to_string());
                true
            }
            (BlockContent::Image { url, .. }, "url") => {
                if let Some(s) = value.as_str() {
                    *url = s.to_string();
                }
                true
            }
            (BlockContent::Image { caption, .. }, "caption") => {
                *caption = value.as_str().map(|s| s.to_string());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip_through_from_type() {
        for name in [
            "paragraph",
            "heading",
            "bulletListItem",
            "numberedListItem",
            "codeBlock",
            "horizontalLine",
            "image",
        ] {
            let content = BlockContent::from_type(name, Vec::new());
            assert_eq!(content.type_name(), name);
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_paragraph() {
        let content = BlockContent::from_type("mystery", vec![Inline::text("hi")]);
        assert_eq!(content.type_name(), "paragraph");
        assert_eq!(content.inline_len(), 2);
    }

    #[test]
    fn test_convert_paragraph_to_heading_keeps_text() {
        let para = BlockContent::from_type("paragraph", vec![Inline::text("title")]);
        let heading = para.convert_to("heading");
        assert_eq!(heading.type_name(), "heading");
        assert_eq!(plain_text(heading.inline().unwrap()), "title");
    }

    #[test]
    fn test_convert_code_block_to_paragraph_keeps_text() {
        let code = BlockContent::CodeBlock {
            language: Some("rust".to_string()),
            text: "fn main() {}".to_string(),
        };
        let para = code.convert_to("paragraph");
        assert_eq!(plain_text(para.inline().unwrap()), "fn main() {}");
    }

    #[test]
    fn test_apply_prop_rejects_undeclared_key() {
        let mut para = BlockContent::Paragraph { inline: Vec::new() };
        assert!(!para.apply_prop("level", &Value::from(2)));
    }

    #[test]
    fn test_heading_level_clamped() {
        let mut heading = BlockContent::Heading {
            level: 1,
            inline: Vec::new(),
        };
        assert!(heading.apply_prop("level", &Value::from(11)));
        match heading {
            BlockContent::Heading { level, .. } => assert_eq!(level, 6),
            _ => panic!("expected heading"),
        }
    }

    #[test]
    fn test_image_is_never_empty() {
        let image = BlockContent::Image {
            url: String::new(),
            caption: None,
        };
        assert!(!image.is_empty());
    }

    #[test]
    fn test_empty_paragraph_is_empty() {
        let para = BlockContent::Paragraph { inline: Vec::new() };
        assert!(para.is_empty());
    }
}
