//! Feed document parsing and per-entry normalization.
//!
//! Individual entries never fail: missing fields fall back to sentinel
//! values so one malformed item cannot sink the whole batch.

use feed_rs::model::Entry;
use regex::Regex;

use crate::core::models::{Article, ArticleBatch};
use crate::errors::ReporterError;

/// Title used when an entry has none.
pub const NO_TITLE: &str = "제목 없음";

/// Raw summaries are cut to this many characters before prompting.
pub const MAX_SUMMARY_CHARS: usize = 1000;

const HTML_RENDER_WIDTH: usize = 1000;

/// Parse a feed document and normalize its first `max_items` entries.
///
/// # Errors
///
/// Returns [`ReporterError::Parse`] when the document is not a feed, or when
/// it is a feed with no entries.
pub fn parse_feed(bytes: &[u8], max_items: usize) -> Result<ArticleBatch, ReporterError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| ReporterError::Parse(format!("unparsable feed document: {}", e)))?;

    if feed.entries.is_empty() {
        return Err(ReporterError::Parse("feed contains no entries".to_string()));
    }

    Ok(feed
        .entries
        .into_iter()
        .take(max_items)
        .map(normalize_entry)
        .collect())
}

#[must_use]
pub fn normalize_entry(entry: Entry) -> Article {
    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let link = entry
        .links
        .first()
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default();

    // `summary` carries RSS <description>; full content is the fallback.
    let raw_summary = entry
        .summary
        .map(|t| t.content)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| entry.content.and_then(|c| c.body))
        .filter(|s| !s.trim().is_empty())
        .map(|s| truncate_chars(&html_to_text(&s), MAX_SUMMARY_CHARS))
        .unwrap_or_default();

    let published_at = entry
        .published
        .or(entry.updated)
        .map(|d| d.to_rfc3339())
        .unwrap_or_default();

    Article {
        title,
        link,
        raw_summary,
        published_at,
    }
}

/// Render an HTML fragment as a single line of plain text.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    static LINK_REF_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"(?m)^\[\d+\]:\s.*$").expect("static regex compile")
    });
    static LINK_MARK_RE: std::sync::LazyLock<Regex> =
        std::sync::LazyLock::new(|| Regex::new(r"\]\[\d+\]").expect("static regex compile"));

    let rendered = html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH)
        .unwrap_or_else(|_| html.to_string());
    let without_refs = LINK_REF_RE.replace_all(&rendered, "");
    let without_marks = LINK_MARK_RE.replace_all(&without_refs, "]");

    without_marks.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
