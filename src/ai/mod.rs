//! All AI/LLM functionality

pub mod client;
pub mod extract;
pub mod prompt_builder;
pub mod summarizer;

// Re-export main types for convenience
pub use client::{LlmClient, estimate_tokens};
pub use extract::{Extraction, extract_payload, parse_payload};
pub use prompt_builder::{CHUNSIK, Persona, build_prompt};
pub use summarizer::{Summarizer, parse_summaries};
