//! Slack API client module
//!
//! Posts the digest with `chat.postMessage`. There is no retry: a failed
//! post fails the run, and nothing is sent twice.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{error, info, warn};

use super::blocks::ChannelMessage;
use crate::core::models::DeliveryResult;
use crate::errors::ReporterError;
use crate::pipeline::ChannelPublisher;

/// Response from `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the API call succeeded.
    pub ok: bool,
    /// Channel ID the message was posted to.
    pub channel: Option<String>,
    /// Timestamp of the posted message.
    pub ts: Option<String>,
    /// Error code if `ok` is false.
    pub error: Option<String>,
}

/// Build the JSON payload for `chat.postMessage`.
#[must_use]
pub fn build_post_message_payload(channel: &str, message: &ChannelMessage) -> Value {
    json!({
        "channel": channel,
        "text": message.fallback_text(),
        "blocks": message.blocks(),
    })
}

/// Slack Web API client
pub struct SlackClient {
    client: Client,
    api_url: String,
}

impl SlackClient {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ReporterError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReporterError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Post a message and report what Slack said about it.
    ///
    /// Provider-side rejections (non-2xx or `ok: false`) come back as a
    /// rejected [`DeliveryResult`]; only a failure to reach Slack at all is
    /// an `Err`.
    ///
    /// # Errors
    ///
    /// [`ReporterError::Transport`] if the request cannot be sent or times out.
    pub async fn post_message(
        &self,
        channel_id: &str,
        message: &ChannelMessage,
        bot_token: &str,
    ) -> Result<DeliveryResult, ReporterError> {
        let payload = build_post_message_payload(channel_id, message);

        let resp = self
            .client
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(bot_token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "chat.postMessage failed: status={} body={}",
                status, body_text
            );
            return Ok(DeliveryResult::rejected(
                channel_id,
                format!("HTTP {}: {}", status, body_text),
            ));
        }

        let post_resp: PostMessageResponse = match resp.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(DeliveryResult::rejected(
                    channel_id,
                    format!("unreadable chat.postMessage response: {}", e),
                ));
            }
        };

        Ok(delivery_from_response(channel_id, post_resp))
    }
}

/// Interpret a `chat.postMessage` body.
#[must_use]
pub fn delivery_from_response(channel_id: &str, resp: PostMessageResponse) -> DeliveryResult {
    let channel = resp.channel.unwrap_or_else(|| channel_id.to_string());
    match (resp.ok, resp.ts) {
        (true, Some(ts)) => {
            info!("Message posted to {} (ts={})", channel, ts);
            DeliveryResult::delivered(channel, ts)
        }
        // Slack accepted the post; failing here would invite a duplicate on re-run
        (true, None) => {
            warn!("Message posted to {} but response has no ts", channel);
            DeliveryResult {
                delivered: true,
                channel_id: channel,
                message_timestamp: None,
                provider_error: None,
            }
        }
        (false, _) => DeliveryResult::rejected(
            channel,
            resp.error.unwrap_or_else(|| "Unknown error".to_string()),
        ),
    }
}

#[async_trait]
impl ChannelPublisher for SlackClient {
    async fn publish(
        &self,
        message: &ChannelMessage,
        channel_id: &str,
        credential: &str,
    ) -> Result<DeliveryResult, ReporterError> {
        self.post_message(channel_id, message, credential).await
    }
}
