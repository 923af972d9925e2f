//! LLM (Anthropic Messages API) client module
//!
//! Encapsulates the single completion call made per run.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::ReporterError;
use crate::pipeline::{CompletionRequest, CompletionService};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// LLM API client for generating the batch narratives
pub struct LlmClient {
    client: Client,
    endpoint: String,
}

impl LlmClient {
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
            endpoint: format!("{}/v1/messages", api_url.trim_end_matches('/')),
        })
    }

    /// Send one user-role message and return the concatenated reply text.
    ///
    /// # Errors
    ///
    /// [`ReporterError::Transport`] when the request fails or the API answers
    /// with a non-success status; [`ReporterError::MalformedResponse`] when
    /// the reply carries no text.
    pub async fn create_message(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<String, ReporterError> {
        #[cfg(feature = "debug-logs")]
        info!("Using prompt:\n{}", request.prompt);

        info!(
            "Requesting completion from model {} (estimated input tokens: {}, max output tokens: {})",
            request.model,
            estimate_tokens(&request.prompt),
            request.max_tokens
        );

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(error_text);
            return Err(ReporterError::Transport(format!(
                "LLM API returned HTTP {}: {}",
                status, detail
            )));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            ReporterError::MalformedResponse(format!("Failed to parse LLM response: {}", e))
        })?;

        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            warn!(
                "LLM reply hit the {} token ceiling and is likely truncated",
                request.max_tokens
            );
        }

        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(ReporterError::MalformedResponse(
                "No text in LLM response".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<String, ReporterError> {
        self.create_message(request, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "claude-test",
            max_tokens: 4096,
            messages: [UserMessage {
                role: "user",
                content: "hello",
            }],
        };
        let v = serde_json::to_value(&body).unwrap();

        assert_eq!(v["model"], "claude-test");
        assert_eq!(v["max_tokens"], 4096);
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_response_ignores_non_text_blocks() {
        let json_str = r#"{
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "{\"articles\": []}"}
            ],
            "stop_reason": "end_turn"
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json_str).unwrap();

        assert_eq!(resp.content.len(), 2);
        assert!(resp.content[0].text.is_none());
        assert_eq!(resp.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = LlmClient::new("http://localhost:1234/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint, "http://localhost:1234/v1/messages");
    }
}
