//! Block Kit subset used by the digest message.

use serde::{Deserialize, Serialize};

/// Slack's limit for `header` block text.
pub const HEADER_TEXT_LIMIT: usize = 150;

/// Slack's limit for `section` block text.
pub const SECTION_TEXT_LIMIT: usize = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TextObject::PlainText { text } | TextObject::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Divider,
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
}

/// A fully rendered message. Built once by the formatter and handed whole to
/// the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMessage {
    blocks: Vec<Block>,
    fallback_text: String,
}

impl ChannelMessage {
    #[must_use]
    pub fn new(blocks: Vec<Block>, fallback_text: String) -> Self {
        Self {
            blocks,
            fallback_text,
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Plain text shown in notifications and by clients that cannot render
    /// blocks.
    #[must_use]
    pub fn fallback_text(&self) -> &str {
        &self.fallback_text
    }
}

/// Escape the three characters Slack treats as control sequences in text.
#[must_use]
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
