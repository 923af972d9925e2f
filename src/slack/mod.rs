//! All Slack-specific functionality

pub mod blocks;
pub mod client;
pub mod message_formatter;

// Re-export main types for convenience
pub use blocks::{Block, ChannelMessage, TextObject};
pub use client::SlackClient;
pub use message_formatter::format_digest;
