use chrono::TimeZone;
use chrono_tz::Asia::Seoul;
use geeknews_reporter::ai::prompt_builder::CHUNSIK;
use geeknews_reporter::core::models::Summary;
use geeknews_reporter::slack::blocks::{Block, SECTION_TEXT_LIMIT, TextObject};
use geeknews_reporter::slack::message_formatter::{format_digest, format_summary_text};

/// Tests for the digest formatting logic.
/// These verify the block layout the channel receives.

const FEED: &str = "https://feeds.feedburner.com/geeknews-feed";

fn summary(n: u32) -> Summary {
    Summary {
        ordinal: n,
        title: format!("Article {n}"),
        link: format!("https://news.hada.io/topic?id={n}"),
        narrative: format!("Narrative {n}이에요."),
    }
}

fn fixed_time() -> chrono::DateTime<chrono_tz::Tz> {
    Seoul.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn section_text(block: &Block) -> &str {
    match block {
        Block::Section { text } => text.text(),
        other => panic!("expected a section block, got {other:?}"),
    }
}

#[test]
fn test_three_summaries_layout() {
    let summaries: Vec<Summary> = (1..=3).map(summary).collect();
    let message = format_digest(&summaries, FEED, &fixed_time(), &CHUNSIK);
    let blocks = message.blocks();

    assert_eq!(blocks.len(), 7, "header, divider, 3 sections, divider, footer");
    assert!(matches!(blocks[0], Block::Header { .. }));
    assert_eq!(blocks[1], Block::Divider);
    for (i, block) in blocks[2..5].iter().enumerate() {
        let text = section_text(block);
        assert!(
            text.starts_with(&format!("*{}. <https://news.hada.io/topic?id={}|", i + 1, i + 1)),
            "section {i} should be numbered in order: {text}"
        );
    }
    assert_eq!(blocks[5], Block::Divider);
    assert!(matches!(blocks[6], Block::Context { .. }));
}

#[test]
fn test_header_carries_date() {
    let message = format_digest(&[summary(1)], FEED, &fixed_time(), &CHUNSIK);

    match &message.blocks()[0] {
        Block::Header {
            text: TextObject::PlainText { text },
        } => assert_eq!(text, "GeekNews 최신 기사 요약(2026.10.18)"),
        other => panic!("expected plain-text header, got {other:?}"),
    }
    assert_eq!(message.fallback_text(), "GeekNews 최신 기사 요약(2026.10.18)");
}

#[test]
fn test_footer_attributes_feed_and_persona() {
    let message = format_digest(&[], FEED, &fixed_time(), &CHUNSIK);

    match message.blocks().last() {
        Some(Block::Context { elements }) => {
            assert_eq!(elements.len(), 1);
            assert_eq!(
                elements[0].text(),
                format!("출처: <{FEED}|GeekNews RSS Feed> | 리포터: 춘식이")
            );
        }
        other => panic!("expected context footer, got {other:?}"),
    }
}

#[test]
fn test_empty_summaries_produce_header_only_message() {
    let message = format_digest(&[], FEED, &fixed_time(), &CHUNSIK);
    let blocks = message.blocks();

    assert_eq!(blocks.len(), 4);
    assert!(!blocks.iter().any(|b| matches!(b, Block::Section { .. })));
}

#[test]
fn test_format_is_pure() {
    let summaries: Vec<Summary> = (1..=5).map(summary).collect();
    let first = format_digest(&summaries, FEED, &fixed_time(), &CHUNSIK);
    let second = format_digest(&summaries, FEED, &fixed_time(), &CHUNSIK);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_summary_text_escapes_control_sequences() {
    let mut s = summary(2);
    s.title = "A <b> & C | D".to_string();
    s.narrative = "x < y > z".to_string();

    let text = format_summary_text(&s);
    assert_eq!(
        text,
        "*2. <https://news.hada.io/topic?id=2|A &lt;b&gt; &amp; C / D>*\nx &lt; y &gt; z"
    );
}

#[test]
fn test_link_with_reserved_characters_keeps_anchor_intact() {
    let mut s = summary(1);
    s.link = "https://x/?a=1&b=<2>|3".to_string();
    s.title = "T".to_string();

    let text = format_summary_text(&s);
    assert!(
        text.starts_with("*1. <https://x/?a=1&amp;b=&lt;2&gt;%7C3|T>*"),
        "{text}"
    );
    assert_eq!(text.matches('|').count(), 1);
}

#[test]
fn test_summary_without_link_has_no_anchor() {
    let mut s = summary(1);
    s.link = String::new();

    assert_eq!(format_summary_text(&s), "*1. Article 1*\nNarrative 1이에요.");
}

#[test]
fn test_long_narrative_is_truncated_to_section_limit() {
    let mut s = summary(1);
    s.narrative = "가".repeat(SECTION_TEXT_LIMIT * 2);

    let message = format_digest(&[s], FEED, &fixed_time(), &CHUNSIK);
    let text = section_text(&message.blocks()[2]);
    assert_eq!(text.chars().count(), SECTION_TEXT_LIMIT);
}
