//! Feed retrieval over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::normalize::parse_feed;
use crate::core::models::ArticleBatch;
use crate::errors::ReporterError;
use crate::pipeline::FeedSource;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 5;
const USER_AGENT: &str = "geeknews-reporter/0.1 (feed digest)";

/// Feed documents larger than this are refused.
pub const MAX_FEED_BYTES: u64 = 5 * 1024 * 1024;

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, ReporterError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReporterError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Download the feed and return at most `max_items` normalized articles.
    ///
    /// # Errors
    ///
    /// [`ReporterError::Transport`] on network failure, timeout, non-success
    /// status or an oversized body; [`ReporterError::Parse`] when the body is
    /// not a feed or has no entries.
    pub async fn fetch(
        &self,
        feed_url: &str,
        max_items: usize,
    ) -> Result<ArticleBatch, ReporterError> {
        debug!("Fetching feed {}", feed_url);

        let response = self.client.get(feed_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReporterError::Transport(format!(
                "feed request returned HTTP {}",
                status
            )));
        }

        if let Some(len) = response.content_length()
            && len > MAX_FEED_BYTES
        {
            return Err(ReporterError::Transport(format!(
                "feed too large: {} bytes (max {} bytes)",
                len, MAX_FEED_BYTES
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > MAX_FEED_BYTES {
            return Err(ReporterError::Transport(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_FEED_BYTES
            )));
        }

        let articles = parse_feed(&bytes, max_items)?;
        info!(
            "Fetched {} articles from {} ({} bytes)",
            articles.len(),
            feed_url,
            bytes.len()
        );
        Ok(articles)
    }
}

#[async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch(
        &self,
        feed_url: &str,
        max_items: usize,
    ) -> Result<ArticleBatch, ReporterError> {
        FeedFetcher::fetch(self, feed_url, max_items).await
    }
}
