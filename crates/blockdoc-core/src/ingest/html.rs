//! HTML ingestion
//!
//! A small, tolerant fragment reader covering the subset of HTML the block
//! model understands: paragraphs, headings, lists, code, rules, images,
//! anchors and the basic emphasis tags. Unknown tags are transparent
//! (their children are read in place); stray close tags are dropped.
//!
//! Before conversion, pasted generic HTML goes through nested-list
//! normalization: a `<ul>`/`<ol>` appearing as a *sibling* of the `<li>`
//! it logically belongs to is re-homed inside that `<li>`, which is the
//! nesting shape the block model's group structure requires.

use crate::errors::Result;
use crate::model::block::Block;
use crate::model::content::{plain_text, Inline, Styles};

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<HtmlNode>,
    },
    Text(String),
}

impl HtmlNode {
    fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Element { tag, .. } => Some(tag.as_str()),
            HtmlNode::Text(_) => None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match self {
            HtmlNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            HtmlNode::Text(_) => None,
        }
    }
}

const VOID_TAGS: [&str; 8] = ["br", "hr", "img", "input", "meta", "link", "col", "wbr"];

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices();
    while let Some((start, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &text[start..];
        let Some(end) = rest.find(';') else {
            out.push(c);
            continue;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(d) => {
                out.push(d);
                // skip the consumed entity
                for _ in 0..end {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }
    out
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Read up to the next tag, returning the intervening text
    fn read_text(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_until(&mut self, marker: &str) {
        match self.rest().find(marker) {
            Some(at) => self.pos += at + marker.len(),
            None => self.pos = self.input.len(),
        }
    }

    /// Parse one tag at the cursor (which sits on '<')
    ///
    /// Returns `(name, attrs, is_close, self_closing)`.
    fn read_tag(&mut self) -> Option<(String, Vec<(String, String)>, bool, bool)> {
        let rest = self.rest();
        let body_end = rest.find('>')?;
        let body = &rest[1..body_end];
        self.pos += body_end + 1;

        let (is_close, body) = match body.strip_prefix('/') {
            Some(stripped) => (true, stripped),
            None => (false, body),
        };
        let (self_closing, body) = match body.strip_suffix('/') {
            Some(stripped) => (true, stripped),
            None => (false, body),
        };

        let body = body.trim();
        let name_end = body
            .find(|c: char| c.is_whitespace())
            .unwrap_or(body.len());
        let name = body[..name_end].to_lowercase();
        if name.is_empty() {
            return None;
        }

        let mut attrs = Vec::new();
        let mut attr_text = body[name_end..].trim();
        while !attr_text.is_empty() {
            let key_end = attr_text
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(attr_text.len());
            let key = attr_text[..key_end].to_lowercase();
            attr_text = attr_text[key_end..].trim_start();
            if let Some(after_eq) = attr_text.strip_prefix('=') {
                let after_eq = after_eq.trim_start();
                let (value, next) = match after_eq.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let inner = &after_eq[1..];
                        match inner.find(quote) {
                            Some(close) => (&inner[..close], &inner[close + 1..]),
                            None => (inner, ""),
                        }
                    }
                    _ => {
                        let end = after_eq
                            .find(|c: char| c.is_whitespace())
                            .unwrap_or(after_eq.len());
                        (&after_eq[..end], &after_eq[end..])
                    }
                };
                if !key.is_empty() {
                    attrs.push((key, decode_entities(value)));
                }
                attr_text = next.trim_start();
            } else if !key.is_empty() {
                attrs.push((key, String::new()));
            } else {
                break;
            }
        }

        Some((name, attrs, is_close, self_closing))
    }
}

/// Parse an HTML fragment into a node forest
///
/// Tolerant by construction: mismatched close tags pop to the nearest
/// matching open tag or are dropped, unterminated tags close at input end.
pub fn parse_fragment(html: &str) -> Vec<HtmlNode> {
    let mut reader = Reader::new(html);
    // (tag, attrs, children) for every open element
    let mut stack: Vec<(String, Vec<(String, String)>, Vec<HtmlNode>)> = Vec::new();
    let mut top: Vec<HtmlNode> = Vec::new();

    loop {
        let text = reader.read_text();
        if !text.is_empty() {
            let node = HtmlNode::Text(decode_entities(text));
            match stack.last_mut() {
                Some((_, _, children)) => children.push(node),
                None => top.push(node),
            }
        }
        let rest = reader.rest();
        if rest.is_empty() {
            break;
        }
        if rest.starts_with("<!--") {
            reader.skip_until("-->");
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            reader.skip_until(">");
            continue;
        }
        let Some((name, attrs, is_close, self_closing)) = reader.read_tag() else {
            // '<' with no closing '>': treat the remainder as text
            let tail = reader.rest();
            if !tail.is_empty() {
                let node = HtmlNode::Text(decode_entities(tail));
                match stack.last_mut() {
                    Some((_, _, children)) => children.push(node),
                    None => top.push(node),
                }
            }
            break;
        };

        if is_close {
            if let Some(open_at) = stack.iter().rposition(|(tag, _, _)| *tag == name) {
                // close everything above the match as well
                while stack.len() > open_at {
                    let (tag, attrs, children) = stack.pop().unwrap_or_default();
                    let node = HtmlNode::Element {
                        tag,
                        attrs,
                        children,
                    };
                    match stack.last_mut() {
                        Some((_, _, parent)) => parent.push(node),
                        None => top.push(node),
                    }
                }
            }
            // stray close tags are dropped
            continue;
        }

        if self_closing || VOID_TAGS.contains(&name.as_str()) {
            let node = HtmlNode::Element {
                tag: name,
                attrs,
                children: Vec::new(),
            };
            match stack.last_mut() {
                Some((_, _, children)) => children.push(node),
                None => top.push(node),
            }
        } else {
            stack.push((name, attrs, Vec::new()));
        }
    }

    // unterminated elements close at input end
    while let Some((tag, attrs, children)) = stack.pop() {
        let node = HtmlNode::Element {
            tag,
            attrs,
            children,
        };
        match stack.last_mut() {
            Some((_, _, parent)) => parent.push(node),
            None => top.push(node),
        }
    }

    top
}

fn is_list_tag(tag: Option<&str>) -> bool {
    matches!(tag, Some("ul") | Some("ol"))
}

/// Re-home lists that are siblings of their logical parent `<li>`
pub fn normalize_nested_lists(nodes: &mut Vec<HtmlNode>) {
    for node in nodes.iter_mut() {
        if let HtmlNode::Element { tag, children, .. } = node {
            if tag == "ul" || tag == "ol" {
                let mut fixed: Vec<HtmlNode> = Vec::with_capacity(children.len());
                for child in children.drain(..) {
                    let misplaced = is_list_tag(child.tag())
                        && matches!(
                            fixed.iter().rev().find_map(HtmlNode::tag),
                            Some("li")
                        );
                    if misplaced {
                        if let Some(HtmlNode::Element {
                            children: li_children,
                            ..
                        }) = fixed
                            .iter_mut()
                            .rev()
                            .find(|n| n.tag() == Some("li"))
                        {
                            li_children.push(child);
                            continue;
                        }
                    }
                    fixed.push(child);
                }
                *children = fixed;
            }
            normalize_nested_lists(children);
        }
    }
}

/// Convert HTML to portable blocks
///
/// `normalize` runs nested-list normalization first; editor-native HTML is
/// trusted and skips it.
pub fn html_to_blocks(html: &str, normalize: bool) -> Result<Vec<Block>> {
    let mut nodes = parse_fragment(html.trim());
    if normalize {
        normalize_nested_lists(&mut nodes);
    }
    Ok(nodes_to_blocks(&nodes))
}

fn nodes_to_blocks(nodes: &[HtmlNode]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for node in nodes {
        match node.tag() {
            Some("p") => {
                let inline = inline_of(children_of(node), Styles::default());
                let mut block = Block::paragraph("");
                block.content = inline;
                blocks.push(block);
            }
            Some(h @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) => {
                let level = h.as_bytes()[1] - b'0';
                let mut block = Block::heading(level, "");
                block.content = inline_of(children_of(node), Styles::default());
                blocks.push(block);
            }
            Some("ul") => blocks.extend(list_items(node, false)),
            Some("ol") => blocks.extend(list_items(node, true)),
            Some("pre") => blocks.push(code_block_of(node)),
            Some("hr") => blocks.push(Block::horizontal_line()),
            Some("img") => {
                let mut block = Block::image(node.attr("src").unwrap_or_default());
                if let Some(alt) = node.attr("alt") {
                    if !alt.is_empty() {
                        block = block.with_prop("caption", alt);
                    }
                }
                blocks.push(block);
            }
            Some("blockquote" | "div" | "section" | "article" | "main" | "body" | "html") => {
                blocks.extend(nodes_to_blocks(children_of(node)));
            }
            Some("br" | "head" | "style" | "script") => {}
            Some(_) => {
                // inline content at block level becomes its own paragraph
                let inline = inline_of(std::slice::from_ref(node), Styles::default());
                if inline.iter().any(|r| !r.is_empty()) {
                    let mut block = Block::paragraph("");
                    block.content = inline;
                    blocks.push(block);
                }
            }
            None => {
                if let HtmlNode::Text(text) = node {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        blocks.push(Block::paragraph(trimmed));
                    }
                }
            }
        }
    }
    blocks
}

fn children_of(node: &HtmlNode) -> &[HtmlNode] {
    match node {
        HtmlNode::Element { children, .. } => children,
        HtmlNode::Text(_) => &[],
    }
}

fn list_items(list: &HtmlNode, ordered: bool) -> Vec<Block> {
    let mut items = Vec::new();
    for child in children_of(list) {
        if child.tag() != Some("li") {
            continue;
        }
        let (nested, inline_nodes): (Vec<&HtmlNode>, Vec<&HtmlNode>) = children_of(child)
            .iter()
            .partition(|n| is_list_tag(n.tag()));

        let mut block = if ordered {
            Block::numbered_list_item("")
        } else {
            Block::bullet_list_item("")
        };
        let owned: Vec<HtmlNode> = inline_nodes.into_iter().cloned().collect();
        block.content = inline_of(&owned, Styles::default());
        for sublist in nested {
            block
                .children
                .extend(list_items(sublist, sublist.tag() == Some("ol")));
        }
        items.push(block);
    }
    items
}

fn code_block_of(pre: &HtmlNode) -> Block {
    // language from <code class="language-...">, text from all descendants
    let mut language = None;
    for child in children_of(pre) {
        if child.tag() == Some("code") {
            if let Some(class) = child.attr("class") {
                language = class
                    .split_whitespace()
                    .find_map(|c| c.strip_prefix("language-"))
                    .map(str::to_string);
            }
        }
    }
    let mut text = String::new();
    collect_text(pre, &mut text);
    if text.ends_with('\n') {
        text.pop();
    }
    Block::code_block(language, text)
}

fn collect_text(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) => out.push_str(text),
        HtmlNode::Element { tag, children, .. } => {
            if tag == "br" {
                out.push('\n');
            }
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

fn inline_of(nodes: &[HtmlNode], styles: Styles) -> Vec<Inline> {
    let mut runs = Vec::new();
    for node in nodes {
        collect_inline(node, styles, &mut runs);
    }
    runs
}

fn collect_inline(node: &HtmlNode, styles: Styles, runs: &mut Vec<Inline>) {
    match node {
        HtmlNode::Text(text) => {
            if !text.is_empty() {
                runs.push(Inline::styled(text.clone(), styles));
            }
        }
        HtmlNode::Element { tag, children, .. } => match tag.as_str() {
            "strong" | "b" => {
                for child in children {
                    collect_inline(child, Styles { bold: true, ..styles }, runs);
                }
            }
            "em" | "i" => {
                for child in children {
                    collect_inline(
                        child,
                        Styles {
                            italic: true,
                            ..styles
                        },
                        runs,
                    );
                }
            }
            "code" => {
                for child in children {
                    collect_inline(child, Styles { code: true, ..styles }, runs);
                }
            }
            "a" => {
                let href = node.attr("href").unwrap_or_default().to_string();
                let text = {
                    let inner = inline_of(children, styles);
                    plain_text(&inner)
                };
                let text = if text.is_empty() { href.clone() } else { text };
                runs.push(Inline::link(href, text));
            }
            "br" => runs.push(Inline::styled("\n", styles)),
            _ => {
                for child in children {
                    collect_inline(child, styles, runs);
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_paragraph() {
        let blocks = html_to_blocks("<p>hello <strong>bold</strong></p>", true).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, "paragraph");
        assert_eq!(blocks[0].content.len(), 2);
    }

    #[test]
    fn test_properly_nested_list() {
        let html = "<ul><li>a<ul><li>b</li></ul></li></ul>";
        let blocks = html_to_blocks(html, true).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, "bulletListItem");
        assert_eq!(blocks[0].children.len(), 1);
    }

    #[test]
    fn test_sibling_nested_list_is_rehomed() {
        // the inner list is a sibling of its logical parent <li>
        let html = "<ul><li>a</li><ul><li>b</li></ul></ul>";
        let blocks = html_to_blocks(html, true).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(
            plain_text(&blocks[0].children[0].content),
            "b"
        );
    }

    #[test]
    fn test_without_normalization_sibling_list_stays_top_level() {
        let html = "<ul><li>a</li><ul><li>b</li></ul></ul>";
        let blocks = html_to_blocks(html, false).unwrap();
        assert_eq!(blocks.len(), 1);
        // the stray list is not an <li>, so it contributes no item
        assert!(blocks[0].children.is_empty());
    }

    #[test]
    fn test_ordered_list_and_heading() {
        let html = "<h2>T</h2><ol><li>one</li><li>two</li></ol>";
        let blocks = html_to_blocks(html, true).unwrap();
        assert_eq!(blocks[0].block_type, "heading");
        assert_eq!(blocks[0].props["level"], 2);
        assert_eq!(blocks[1].block_type, "numberedListItem");
        assert_eq!(blocks[2].block_type, "numberedListItem");
    }

    #[test]
    fn test_pre_code_language() {
        let html = "<pre><code class=\"language-rust\">let x;</code></pre>";
        let blocks = html_to_blocks(html, true).unwrap();
        assert_eq!(blocks[0].block_type, "codeBlock");
        assert_eq!(blocks[0].props["language"], "rust");
    }

    #[test]
    fn test_img_and_hr() {
        let html = "<img src=\"https://e.com/a.png\" alt=\"pic\"><hr>";
        let blocks = html_to_blocks(html, true).unwrap();
        assert_eq!(blocks[0].block_type, "image");
        assert_eq!(blocks[0].props["url"], "https://e.com/a.png");
        assert_eq!(blocks[0].props["caption"], "pic");
        assert_eq!(blocks[1].block_type, "horizontalLine");
    }

    #[test]
    fn test_entities_decoded() {
        let blocks = html_to_blocks("<p>a &amp; b &#64; c</p>", true).unwrap();
        assert_eq!(plain_text(&blocks[0].content), "a & b @ c");
    }

    #[test]
    fn test_unclosed_tags_are_tolerated() {
        let blocks = html_to_blocks("<p>open", true).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(plain_text(&blocks[0].content), "open");
    }

    #[test]
    fn test_anchor_becomes_link_run() {
        let blocks = html_to_blocks("<p><a href=\"https://e.com\">site</a></p>", true).unwrap();
        assert_eq!(
            blocks[0].content,
            vec![Inline::link("https://e.com", "site")]
        );
    }
}
