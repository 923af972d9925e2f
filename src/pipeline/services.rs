//! Seams between the runner and its network collaborators.
//!
//! Credentials are passed per call so a collaborator can be built before the
//! configuration is known to be complete.

use async_trait::async_trait;

use crate::core::models::{ArticleBatch, DeliveryResult};
use crate::errors::ReporterError;
use crate::slack::blocks::ChannelMessage;

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, feed_url: &str, max_items: usize)
    -> Result<ArticleBatch, ReporterError>;
}

/// A single completion request: model, output ceiling, one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub prompt: String,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<String, ReporterError>;
}

#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Deliver `message`. A provider rejection is reported in the returned
    /// [`DeliveryResult`], not as an error.
    async fn publish(
        &self,
        message: &ChannelMessage,
        channel_id: &str,
        credential: &str,
    ) -> Result<DeliveryResult, ReporterError>;
}
