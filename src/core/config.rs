use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::errors::ReporterError;

pub const DEFAULT_SLACK_CHANNEL: &str = "010-agent-news";
pub const DEFAULT_FEED_URL: &str = "https://feeds.feedburner.com/geeknews-feed";
pub const DEFAULT_MAX_ARTICLES: usize = 10;
pub const MAX_ARTICLES_CEILING: usize = 50;
pub const DEFAULT_LLM_MODEL: &str = "claude-opus-4-20250514";
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_SLACK_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct AppConfig {
    pub llm_api_key: String,
    pub slack_bot_token: String,
    pub slack_channel: String,
    pub feed_url: String,
    pub max_articles: usize,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_api_url: String,
    pub slack_api_url: String,
    pub timezone: Tz,
    pub feed_timeout: Duration,
    pub llm_timeout: Duration,
    pub slack_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ReporterError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Both credentials are checked before anything else so that a missing
    /// secret aborts the run ahead of any network traffic.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReporterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let llm_api_key = get("ANTHROPIC_API_KEY").ok_or_else(|| {
            ReporterError::Configuration("ANTHROPIC_API_KEY is not set".to_string())
        })?;
        let slack_bot_token = get("SLACK_BOT_TOKEN").ok_or_else(|| {
            ReporterError::Configuration("SLACK_BOT_TOKEN is not set".to_string())
        })?;

        let max_articles = parse_or(get("NUM_ARTICLES"), "NUM_ARTICLES", DEFAULT_MAX_ARTICLES)?;
        if max_articles == 0 || max_articles > MAX_ARTICLES_CEILING {
            return Err(ReporterError::Configuration(format!(
                "NUM_ARTICLES must be between 1 and {}, got {}",
                MAX_ARTICLES_CEILING, max_articles
            )));
        }

        let timezone = match get("REPORT_TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|_| {
                ReporterError::Configuration(format!("REPORT_TIMEZONE: unknown timezone {}", name))
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let feed_url = get("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        url::Url::parse(&feed_url)
            .map_err(|e| ReporterError::Configuration(format!("FEED_URL: {}", e)))?;

        Ok(Self {
            llm_api_key,
            slack_bot_token,
            slack_channel: get("SLACK_CHANNEL").unwrap_or_else(|| DEFAULT_SLACK_CHANNEL.to_string()),
            feed_url,
            max_articles,
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_max_tokens: parse_or(get("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS", DEFAULT_LLM_MAX_TOKENS)?,
            llm_api_url: get("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            slack_api_url: get("SLACK_API_URL")
                .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
            timezone,
            feed_timeout: Duration::from_secs(parse_or(
                get("FEED_TIMEOUT_SECS"),
                "FEED_TIMEOUT_SECS",
                DEFAULT_FEED_TIMEOUT_SECS,
            )?),
            llm_timeout: Duration::from_secs(parse_or(
                get("LLM_TIMEOUT_SECS"),
                "LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
            slack_timeout: Duration::from_secs(parse_or(
                get("SLACK_TIMEOUT_SECS"),
                "SLACK_TIMEOUT_SECS",
                DEFAULT_SLACK_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ReporterError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| ReporterError::Configuration(format!("{}: {} ({})", key, e, value))),
        None => Ok(default),
    }
}

// Credentials are reported by length only.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("llm_api_key", &format_args!("<{} chars>", self.llm_api_key.len()))
            .field(
                "slack_bot_token",
                &format_args!("<{} chars>", self.slack_bot_token.len()),
            )
            .field("slack_channel", &self.slack_channel)
            .field("feed_url", &self.feed_url)
            .field("max_articles", &self.max_articles)
            .field("llm_model", &self.llm_model)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_api_url", &self.llm_api_url)
            .field("slack_api_url", &self.slack_api_url)
            .field("timezone", &self.timezone)
            .field("feed_timeout", &self.feed_timeout)
            .field("llm_timeout", &self.llm_timeout)
            .field("slack_timeout", &self.slack_timeout)
            .finish()
    }
}
