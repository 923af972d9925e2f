#![allow(clippy::missing_errors_doc)]
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::services::{ChannelPublisher, CompletionService, FeedSource};
use crate::ai::client::LlmClient;
use crate::ai::prompt_builder::{CHUNSIK, Persona};
use crate::ai::summarizer::Summarizer;
use crate::core::config::AppConfig;
use crate::core::models::DeliveryResult;
use crate::errors::{PipelineFailure, ReporterError, Stage};
use crate::feed::fetcher::FeedFetcher;
use crate::slack::client::SlackClient;
use crate::slack::message_formatter::format_digest;

/// Lifecycle of a single run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Summarizing,
    Formatting,
    Publishing,
    Done,
    Failed,
}

impl RunState {
    #[must_use]
    pub fn can_advance_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Idle, RunState::Fetching)
                | (RunState::Fetching, RunState::Summarizing)
                | (RunState::Summarizing, RunState::Formatting)
                | (RunState::Formatting, RunState::Publishing)
                | (RunState::Publishing, RunState::Done)
                | (
                    RunState::Fetching
                        | RunState::Summarizing
                        | RunState::Formatting
                        | RunState::Publishing,
                    RunState::Failed
                )
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    /// Stage a failure in this state is attributed to.
    fn stage(self) -> Stage {
        match self {
            RunState::Summarizing => Stage::Summarize,
            RunState::Formatting => Stage::Format,
            RunState::Publishing => Stage::Publish,
            _ => Stage::Fetch,
        }
    }
}

/// The collaborators a run talks to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub feed: &'a dyn FeedSource,
    pub llm: &'a dyn CompletionService,
    pub publisher: &'a dyn ChannelPublisher,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub correlation_id: String,
    pub articles: usize,
    pub delivery: DeliveryResult,
    pub transitions: Vec<RunState>,
}

struct RunTracker {
    correlation_id: String,
    state: RunState,
    transitions: Vec<RunState>,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            state: RunState::Idle,
            transitions: vec![RunState::Idle],
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(
            "Run {} transition {:?} -> {:?}",
            self.correlation_id, self.state, next
        );
        self.state = next;
        self.transitions.push(next);
    }

    fn fail(&mut self, error: ReporterError) -> PipelineFailure {
        let stage = self.state.stage();
        self.advance(RunState::Failed);
        error!(
            "Run {} failed in {} stage: {}",
            self.correlation_id, stage, error
        );
        PipelineFailure::new(stage, error)
    }
}

/// Sequences fetch, summarize, format and publish for one run.
///
/// The runner keeps nothing between calls to [`PipelineRunner::run`]; every
/// call is a fresh run with its own correlation id.
pub struct PipelineRunner<'a> {
    config: &'a AppConfig,
    services: Services<'a>,
    persona: &'a Persona,
}

impl<'a> PipelineRunner<'a> {
    #[must_use]
    pub fn new(config: &'a AppConfig, services: Services<'a>) -> Self {
        Self {
            config,
            services,
            persona: &CHUNSIK,
        }
    }

    #[must_use]
    pub fn with_persona(mut self, persona: &'a Persona) -> Self {
        self.persona = persona;
        self
    }

    pub async fn run(&self) -> Result<RunReport, PipelineFailure> {
        let now = Utc::now().with_timezone(&self.config.timezone);
        self.run_at(now).await
    }

    /// Run with an explicit timestamp for the message header.
    pub async fn run_at(&self, generated_at: DateTime<Tz>) -> Result<RunReport, PipelineFailure> {
        let mut run = RunTracker::new();
        info!(
            "Run {} started: feed={} channel={} max_articles={}",
            run.correlation_id,
            self.config.feed_url,
            self.config.slack_channel,
            self.config.max_articles
        );

        run.advance(RunState::Fetching);
        let articles = match self
            .services
            .feed
            .fetch(&self.config.feed_url, self.config.max_articles)
            .await
        {
            Ok(articles) => articles,
            Err(e) => return Err(run.fail(e)),
        };
        info!(
            "Run {} fetched {} articles",
            run.correlation_id,
            articles.len()
        );

        run.advance(RunState::Summarizing);
        let summarizer = Summarizer::new(self.services.llm, self.config);
        let summaries = match summarizer.summarize(&articles, self.persona).await {
            Ok(summaries) => summaries,
            Err(e) => return Err(run.fail(e)),
        };

        run.advance(RunState::Formatting);
        let message = format_digest(&summaries, &self.config.feed_url, &generated_at, self.persona);
        debug!(
            "Run {} formatted {} blocks",
            run.correlation_id,
            message.blocks().len()
        );

        run.advance(RunState::Publishing);
        let delivery = match self
            .services
            .publisher
            .publish(
                &message,
                &self.config.slack_channel,
                &self.config.slack_bot_token,
            )
            .await
            .and_then(DeliveryResult::into_result)
        {
            Ok(delivery) => delivery,
            Err(e) => return Err(run.fail(e)),
        };

        run.advance(RunState::Done);
        info!(
            "Run {} delivered to {} (ts={})",
            run.correlation_id,
            delivery.channel_id,
            delivery.message_timestamp.as_deref().unwrap_or("-")
        );

        Ok(RunReport {
            correlation_id: run.correlation_id,
            articles: articles.len(),
            delivery,
            transitions: run.transitions,
        })
    }
}

/// Load configuration through `lookup`, then run once against `services`.
///
/// Configuration problems are reported before any collaborator is called.
pub async fn run_with_lookup<F>(
    lookup: F,
    services: Services<'_>,
) -> Result<RunReport, PipelineFailure>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(lookup)
        .map_err(|e| PipelineFailure::new(Stage::Configuration, e))?;
    PipelineRunner::new(&config, services).run().await
}

/// Production entry point: environment configuration and real HTTP clients.
pub async fn run_from_env() -> Result<RunReport, PipelineFailure> {
    let config =
        AppConfig::from_env().map_err(|e| PipelineFailure::new(Stage::Configuration, e))?;
    info!("Loaded configuration: {:?}", config);

    let configuration = |e| PipelineFailure::new(Stage::Configuration, e);
    let feed = FeedFetcher::new(config.feed_timeout).map_err(configuration)?;
    let llm = LlmClient::new(&config.llm_api_url, config.llm_timeout).map_err(configuration)?;
    let slack =
        SlackClient::new(&config.slack_api_url, config.slack_timeout).map_err(configuration)?;

    let services = Services {
        feed: &feed,
        llm: &llm,
        publisher: &slack,
    };
    PipelineRunner::new(&config, services).run().await
}
