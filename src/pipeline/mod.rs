//! Pipeline orchestration

pub mod runner;
pub mod services;

pub use runner::{
    PipelineRunner, RunReport, RunState, Services, run_from_env, run_with_lookup,
};
pub use services::{ChannelPublisher, CompletionRequest, CompletionService, FeedSource};
