//! Markdown ingestion
//!
//! Parses pasted Markdown into portable blocks. Coverage follows the block
//! model: headings, paragraphs, nested ordered/unordered lists, fenced and
//! indented code blocks, thematic breaks, images, links and the basic
//! emphasis styles. Anything richer degrades to its plain text rather than
//! failing the paste.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::errors::Result;
use crate::model::block::Block;
use crate::model::content::{Inline, Styles};

/// Parse Markdown text into blocks
///
/// Returns an empty vector when the text contains nothing block-worthy;
/// the pipeline treats that as "parsing yielded no blocks" and falls back
/// to plain-text insertion.
pub fn parse_markdown_to_blocks(text: &str) -> Result<Vec<Block>> {
    let events: Vec<Event> = Parser::new_ext(text, Options::empty()).collect();
    let mut i = 0;
    Ok(parse_block_seq(&events, &mut i, None))
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse a sequence of block-level events until `until` (or input end)
fn parse_block_seq(events: &[Event], i: &mut usize, until: Option<&TagEnd>) -> Vec<Block> {
    let mut blocks = Vec::new();

    while *i < events.len() {
        match &events[*i] {
            Event::End(end) if Some(end) == until => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let (inline, images) = collect_inline(events, i, TagEnd::Paragraph);
                blocks.extend(paragraph_blocks(inline, images));
            }
            Event::Start(Tag::Heading { level, .. }) => {
                let level = heading_level(*level);
                *i += 1;
                let (inline, _) = collect_inline(events, i, TagEnd::Heading(heading_tag(level)));
                let mut block = Block::heading(level, "");
                block.content = inline;
                blocks.push(block);
            }
            Event::Start(Tag::List(start)) => {
                let ordered = start.is_some();
                *i += 1;
                blocks.extend(parse_list(events, i, ordered));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.to_string();
                        if lang.is_empty() {
                            None
                        } else {
                            Some(lang)
                        }
                    }
                    CodeBlockKind::Indented => None,
                };
                *i += 1;
                let mut text = String::new();
                while *i < events.len() {
                    match &events[*i] {
                        Event::End(TagEnd::CodeBlock) => {
                            *i += 1;
                            break;
                        }
                        Event::Text(t) => {
                            text.push_str(t);
                            *i += 1;
                        }
                        _ => *i += 1,
                    }
                }
                if text.ends_with('\n') {
                    text.pop();
                }
                blocks.push(Block::code_block(language, text));
            }
            Event::Rule => {
                *i += 1;
                blocks.push(Block::horizontal_line());
            }
            Event::Start(Tag::BlockQuote(_)) => {
                *i += 1;
                blocks.extend(parse_block_seq(events, i, Some(&TagEnd::BlockQuote(None))));
            }
            Event::Start(Tag::HtmlBlock) => {
                *i += 1;
                while *i < events.len() {
                    if matches!(&events[*i], Event::End(TagEnd::HtmlBlock)) {
                        *i += 1;
                        break;
                    }
                    *i += 1;
                }
            }
            // Anything unexpected at block level is skipped
            _ => *i += 1,
        }
    }
    blocks
}

fn heading_tag(level: u8) -> HeadingLevel {
    match level {
        1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}

/// A paragraph's collected inline runs and lifted-out images
///
/// A paragraph consisting solely of an image becomes an image block; a
/// mixed paragraph keeps its text and appends the images as blocks after
/// it, so pasted images are always block-level.
fn paragraph_blocks(inline: Vec<Inline>, images: Vec<(String, String)>) -> Vec<Block> {
    let mut out = Vec::new();
    let has_text = inline.iter().any(|r| !r.is_empty());
    if has_text {
        let mut block = Block::paragraph("");
        block.content = inline;
        out.push(block);
    }
    for (url, alt) in images {
        let mut image = Block::image(url);
        if !alt.is_empty() {
            image = image.with_prop("caption", alt);
        }
        out.push(image);
    }
    out
}

fn parse_list(events: &[Event], i: &mut usize, ordered: bool) -> Vec<Block> {
    let mut items = Vec::new();
    while *i < events.len() {
        match &events[*i] {
            Event::End(TagEnd::List(_)) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Item) => {
                *i += 1;
                items.push(parse_list_item(events, i, ordered));
            }
            _ => *i += 1,
        }
    }
    items
}

fn parse_list_item(events: &[Event], i: &mut usize, ordered: bool) -> Block {
    let mut inline = Vec::new();
    let mut children = Vec::new();

    while *i < events.len() {
        match &events[*i] {
            Event::End(TagEnd::Item) => {
                *i += 1;
                break;
            }
            // Loose list items wrap their text in a paragraph
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let (runs, _) = collect_inline(events, i, TagEnd::Paragraph);
                if inline.is_empty() {
                    inline = runs;
                } else {
                    children.extend(paragraph_blocks(runs, Vec::new()));
                }
            }
            Event::Start(Tag::List(start)) => {
                let nested_ordered = start.is_some();
                *i += 1;
                children.extend(parse_list(events, i, nested_ordered));
            }
            _ => {
                // Tight list items carry inline events directly
                let before = *i;
                let (runs, _) = collect_tight_inline(events, i);
                if *i == before {
                    // stray event the inline collector does not recognize
                    *i += 1;
                } else if inline.is_empty() {
                    inline = runs;
                }
            }
        }
    }

    let mut block = if ordered {
        Block::numbered_list_item("")
    } else {
        Block::bullet_list_item("")
    };
    block.content = inline;
    block.children = children;
    block
}

/// Collect inline events until the given end tag
///
/// Returns the styled runs and any images encountered as `(url, alt)`.
fn collect_inline(events: &[Event], i: &mut usize, until: TagEnd) -> (Vec<Inline>, Vec<(String, String)>) {
    let mut runs: Vec<Inline> = Vec::new();
    let mut images = Vec::new();
    let mut styles = Styles::default();

    while *i < events.len() {
        match &events[*i] {
            Event::End(end) if *end == until => {
                *i += 1;
                break;
            }
            Event::Text(t) => {
                push_text(&mut runs, t, styles);
                *i += 1;
            }
            Event::Code(t) => {
                push_text(
                    &mut runs,
                    t,
                    Styles {
                        code: true,
                        ..styles
                    },
                );
                *i += 1;
            }
            Event::SoftBreak => {
                push_text(&mut runs, " ", styles);
                *i += 1;
            }
            Event::HardBreak => {
                push_text(&mut runs, "\n", styles);
                *i += 1;
            }
            Event::Start(Tag::Emphasis) => {
                styles.italic = true;
                *i += 1;
            }
            Event::End(TagEnd::Emphasis) => {
                styles.italic = false;
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                styles.bold = true;
                *i += 1;
            }
            Event::End(TagEnd::Strong) => {
                styles.bold = false;
                *i += 1;
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                let href = dest_url.to_string();
                *i += 1;
                let (inner, _) = collect_inline(events, i, TagEnd::Link);
                let text = crate::model::content::plain_text(&inner);
                let text = if text.is_empty() { href.clone() } else { text };
                runs.push(Inline::link(href, text));
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                let url = dest_url.to_string();
                *i += 1;
                let (alt_runs, _) = collect_inline(events, i, TagEnd::Image);
                images.push((url, crate::model::content::plain_text(&alt_runs)));
            }
            // Unknown inline constructs contribute nothing
            _ => *i += 1,
        }
    }
    (runs, images)
}

/// Collect a run of bare inline events (tight list items)
fn collect_tight_inline(events: &[Event], i: &mut usize) -> (Vec<Inline>, Vec<(String, String)>) {
    let mut runs: Vec<Inline> = Vec::new();
    let mut images = Vec::new();
    let mut styles = Styles::default();

    while *i < events.len() {
        match &events[*i] {
            Event::Text(t) => {
                push_text(&mut runs, t, styles);
                *i += 1;
            }
            Event::Code(t) => {
                push_text(
                    &mut runs,
                    t,
                    Styles {
                        code: true,
                        ..styles
                    },
                );
                *i += 1;
            }
            Event::SoftBreak => {
                push_text(&mut runs, " ", styles);
                *i += 1;
            }
            Event::Start(Tag::Emphasis) => {
                styles.italic = true;
                *i += 1;
            }
            Event::End(TagEnd::Emphasis) => {
                styles.italic = false;
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                styles.bold = true;
                *i += 1;
            }
            Event::End(TagEnd::Strong) => {
                styles.bold = false;
                *i += 1;
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                let href = dest_url.to_string();
                *i += 1;
                let (inner, _) = collect_inline(events, i, TagEnd::Link);
                let text = crate::model::content::plain_text(&inner);
                let text = if text.is_empty() { href.clone() } else { text };
                runs.push(Inline::link(href, text));
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                let url = dest_url.to_string();
                *i += 1;
                let (alt_runs, _) = collect_inline(events, i, TagEnd::Image);
                images.push((url, crate::model::content::plain_text(&alt_runs)));
            }
            _ => break,
        }
    }
    (runs, images)
}

fn push_text(runs: &mut Vec<Inline>, text: &str, styles: Styles) {
    if text.is_empty() {
        return;
    }
    // merge with a preceding run of identical style
    if let Some(Inline::Text {
        text: prev,
        styles: prev_styles,
    }) = runs.last_mut()
    {
        if *prev_styles == styles {
            prev.push_str(text);
            return;
        }
    }
    runs.push(Inline::styled(text, styles));
}
