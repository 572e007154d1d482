//! Plain-text linkification
//!
//! Before pasted plain text is parsed as Markdown, each line that consists
//! of a single URL is rewritten as a Markdown link, or a Markdown image
//! when the URL ends in a recognized image extension. Mixed lines pass
//! through unchanged.

use std::sync::OnceLock;

use regex::Regex;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(https?://)?((([a-z\d]([a-z\d-]*[a-z\d])*)\.)+[a-z]{2,}|((\d{1,3}\.){3}\d{1,3}))(:\d+)?(/[-a-z\d%_.~+]*)*(\?[;&a-z\d%_.~+=-]*)?(\#[-a-z\d_]*)?$",
        )
        .unwrap()
    })
}

fn image_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(jpeg|jpg|gif|png|svg|webp)$").unwrap())
}

/// Whether the whole string is a URL
pub fn is_valid_url(s: &str) -> bool {
    !s.is_empty() && url_regex().is_match(s)
}

/// Whether a URL points at an image
pub fn is_image_url(url: &str) -> bool {
    image_url_regex().is_match(url)
}

/// Rewrite URL-only lines as Markdown links or images
///
/// Lines are trimmed; non-matching lines pass through unchanged; the
/// result is rejoined with newlines.
pub fn convert_links_to_markdown(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let line = line.trim();
            if is_valid_url(line) {
                if is_image_url(line) {
                    format!("![]({})", line)
                } else {
                    format!("[{}]({})", line, line)
                }
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
