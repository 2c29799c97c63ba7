// src/ingest/mod.rs
pub mod fetcher;
pub mod parse;
pub mod transport;
pub mod types;

use once_cell::sync::OnceCell;
use regex::Regex;

pub use fetcher::FeedFetcher;
pub use transport::HttpTransport;
pub use types::{FeedSource, FeedTransport, RawItem};

/// Placeholder used when an entry carries no usable title.
pub const UNTITLED: &str = "No title";

/// Summary length cap, in characters.
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Appended to a summary only when it was clipped.
pub const TRUNCATION_MARKER: &str = "...";

fn block_tag_regex() -> &'static Regex {
    static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
    RE_BLOCK.get_or_init(|| {
        Regex::new(r"(?i)</?(p|br|div|li|ul|ol|h[1-6]|tr|td|blockquote)\b[^>]*>")
            .expect("block tag regex")
    })
}

fn tag_regex() -> &'static Regex {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"))
}

fn ws_regex() -> &'static Regex {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Normalize text: decode entities, strip markup, collapse whitespace.
///
/// Entities are decoded before tags are stripped, so escaped markup such as
/// `&lt;b&gt;` cannot survive as a live tag.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let decoded = html_escape::decode_html_entities(s);

    // 2) Strip HTML tags; block-level ones become a space so paragraphs don't fuse
    let spaced = block_tag_regex().replace_all(&decoded, " ");
    let stripped = tag_regex().replace_all(&spaced, "");

    // 3) Collapse whitespace (`\s` is Unicode-aware, so NBSP folds too)
    ws_regex().replace_all(&stripped, " ").trim().to_string()
}

/// Title for display: normalized, or the placeholder when nothing is left.
pub fn clean_title(raw: Option<&str>) -> String {
    let t = raw.map(normalize_text).unwrap_or_default();
    if t.is_empty() {
        UNTITLED.to_string()
    } else {
        t
    }
}

/// Summary for display: normalized, then capped at [`SUMMARY_MAX_CHARS`]
/// characters with [`TRUNCATION_MARKER`] when clipped.
pub fn clean_summary(raw: Option<&str>) -> String {
    let text = raw.map(normalize_text).unwrap_or_default();
    truncate_chars(&text, SUMMARY_MAX_CHARS)
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
        None => text.to_string(),
    }
}
