use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ReporterError {
    #[error("Missing or invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to reach remote service: {0}")]
    Transport(String),

    #[error("Failed to parse feed: {0}")]
    Parse(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Chat provider rejected the message: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for ReporterError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ReporterError::Transport(format!("request timed out: {}", error))
        } else {
            ReporterError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(error: serde_json::Error) -> Self {
        ReporterError::MalformedResponse(error.to_string())
    }
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Fetch,
    Summarize,
    /// Rendering is currently infallible; kept so the stage and exit code
    /// stay stable if it gains a failure mode.
    Format,
    Publish,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Configuration => "configuration",
            Stage::Fetch => "fetch",
            Stage::Summarize => "summarize",
            Stage::Format => "format",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal error tagged with the stage that produced it.
///
/// This is the only error type that crosses the process boundary; the
/// binary turns it into a diagnostic line and an exit code.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: ReporterError,
}

impl PipelineFailure {
    #[must_use]
    pub fn new(stage: Stage, error: ReporterError) -> Self {
        Self { stage, error }
    }

    /// Process exit code for this failure. Never zero.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.stage {
            Stage::Configuration => 2,
            Stage::Fetch => 3,
            Stage::Summarize => 4,
            Stage::Format => 5,
            Stage::Publish => 6,
        }
    }
}
