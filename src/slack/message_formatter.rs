//! Message formatting for Slack
//!
//! Renders summaries into the digest layout:
//! header, divider, one section per summary, divider, attribution footer.
//! Everything here is pure; the same inputs always produce the same message.

use chrono::DateTime;
use chrono_tz::Tz;

use super::blocks::{
    Block, ChannelMessage, HEADER_TEXT_LIMIT, SECTION_TEXT_LIMIT, TextObject, escape_mrkdwn,
};
use crate::ai::prompt_builder::Persona;
use crate::core::models::Summary;

const TRUNCATION_MARK: char = '…';

/// Format the digest message for a run.
#[must_use]
pub fn format_digest(
    summaries: &[Summary],
    source_url: &str,
    generated_at: &DateTime<Tz>,
    persona: &Persona,
) -> ChannelMessage {
    let header_text = format!(
        "{} 최신 기사 요약({})",
        persona.feed_name,
        generated_at.format("%Y.%m.%d")
    );

    let mut blocks = Vec::with_capacity(summaries.len() + 4);
    blocks.push(Block::Header {
        text: TextObject::PlainText {
            text: truncate_with_mark(&header_text, HEADER_TEXT_LIMIT),
        },
    });
    blocks.push(Block::Divider);

    for summary in summaries {
        blocks.push(Block::Section {
            text: TextObject::Mrkdwn {
                text: truncate_with_mark(&format_summary_text(summary), SECTION_TEXT_LIMIT),
            },
        });
    }

    blocks.push(Block::Divider);
    blocks.push(Block::Context {
        elements: vec![TextObject::Mrkdwn {
            text: format_footer(source_url, persona),
        }],
    });

    ChannelMessage::new(blocks, header_text)
}

/// `*N. <link|title>*` followed by the narrative on the next line.
#[must_use]
pub fn format_summary_text(summary: &Summary) -> String {
    let title = escape_mrkdwn(&summary.title);
    let heading = if summary.link.is_empty() {
        format!("*{}. {}*", summary.ordinal, title)
    } else {
        // `|` would end the anchor label early
        format!(
            "*{}. <{}|{}>*",
            summary.ordinal,
            anchor_url(&summary.link),
            title.replace('|', "/")
        )
    };

    format!("{}\n{}", heading, escape_mrkdwn(&summary.narrative))
}

#[must_use]
pub fn format_footer(source_url: &str, persona: &Persona) -> String {
    format!(
        "출처: <{}|{} RSS Feed> | 리포터: {}",
        anchor_url(source_url),
        persona.feed_name,
        persona.name
    )
}

/// URL half of a `<url|label>` anchor. `|` is percent-encoded so the label
/// boundary stays where it belongs.
fn anchor_url(url: &str) -> String {
    escape_mrkdwn(url.trim()).replace('|', "%7C")
}

fn truncate_with_mark(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push(TRUNCATION_MARK);
    out
}
