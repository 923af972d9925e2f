/// GeekNews reporter - posts a persona-voiced digest of the latest feed
/// articles to a Slack channel.
///
/// Each run is one pass through a strictly forward pipeline:
/// 1. Fetch the feed and normalize its newest entries
/// 2. Ask the LLM for one narrative per article as a single JSON payload
/// 3. Render the narratives as Block Kit blocks
/// 4. Post the message with `chat.postMessage`
///
/// Any failure stops the run; nothing is retried and no partial message is
/// ever posted, so the job is safe to re-trigger.
///
/// # Architecture
///
/// The system uses:
/// - feed-rs for RSS/Atom parsing
/// - the Anthropic Messages API for summaries
/// - the Slack Web API for delivery
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// #[tokio::main]
/// async fn main() {
///     geeknews_reporter::setup_logging();
///
///     match geeknews_reporter::run_from_env().await {
///         Ok(report) => println!("Posted at {:?}", report.delivery.message_timestamp),
///         Err(failure) => eprintln!("{}", failure),
///     }
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod feed;
pub mod pipeline;
pub mod slack;

// Re-exports for the binary and tests
pub use ai::estimate_tokens;
pub use core::config::AppConfig;
pub use core::models::{Article, ArticleBatch, DeliveryResult, Summary};
pub use errors::{PipelineFailure, ReporterError, Stage};
pub use pipeline::{PipelineRunner, RunReport, RunState, Services, run_from_env, run_with_lookup};

/// Configure structured logging.
///
/// Honors `RUST_LOG` (default `info`). Set `LOG_FORMAT=json` to emit one JSON
/// object per line for log shippers. Calling this more than once is harmless.
///
/// # Example
///
/// ```
/// geeknews_reporter::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    };
}
