//! Batch summarization: one prompt, one completion, strict 1:1 alignment.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::extract::parse_payload;
use super::prompt_builder::{Persona, build_prompt};
use crate::core::config::AppConfig;
use crate::core::models::{Article, Summary};
use crate::errors::ReporterError;
use crate::pipeline::{CompletionRequest, CompletionService};

/// One entry of the model's `articles` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub script: String,
}

pub struct Summarizer<'a> {
    llm: &'a dyn CompletionService,
    config: &'a AppConfig,
}

impl<'a> Summarizer<'a> {
    #[must_use]
    pub fn new(llm: &'a dyn CompletionService, config: &'a AppConfig) -> Self {
        Self { llm, config }
    }

    /// Produce exactly one [`Summary`] per article, in batch order.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the LLM service and returns
    /// [`ReporterError::MalformedResponse`] when the reply cannot be parsed
    /// or does not line up with `batch`.
    pub async fn summarize(
        &self,
        batch: &[Article],
        persona: &Persona,
    ) -> Result<Vec<Summary>, ReporterError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest {
            model: self.config.llm_model.clone(),
            max_tokens: self.config.llm_max_tokens,
            prompt: build_prompt(batch, persona),
        };

        let reply = self.llm.complete(&request, &self.config.llm_api_key).await?;
        let summaries = parse_summaries(&reply, batch)?;

        info!("Generated {} summaries", summaries.len());
        Ok(summaries)
    }
}

/// Parse a raw model reply and align it against the batch it answers.
///
/// Accepts either `{"articles": [...]}` or a bare array.
///
/// # Errors
///
/// Returns [`ReporterError::MalformedResponse`] on any parse failure, count
/// mismatch, out-of-order number, link mismatch or blank script.
pub fn parse_summaries(reply: &str, batch: &[Article]) -> Result<Vec<Summary>, ReporterError> {
    let value: Value = parse_payload(reply)?;

    let entries_value = match value {
        Value::Object(mut map) => map.remove("articles").ok_or_else(|| {
            ReporterError::MalformedResponse("payload has no \"articles\" field".to_string())
        })?,
        array @ Value::Array(_) => array,
        other => {
            return Err(ReporterError::MalformedResponse(format!(
                "expected an object or array, got {}",
                json_kind(&other)
            )));
        }
    };

    let entries: Vec<ScriptEntry> = serde_json::from_value(entries_value).map_err(|e| {
        ReporterError::MalformedResponse(format!("invalid article entries: {}", e))
    })?;

    align(entries, batch)
}

/// Strict alignment: same length, numbered 1..=n in order, links echoed back.
fn align(entries: Vec<ScriptEntry>, batch: &[Article]) -> Result<Vec<Summary>, ReporterError> {
    if entries.len() != batch.len() {
        return Err(ReporterError::MalformedResponse(format!(
            "expected {} summaries, model returned {}",
            batch.len(),
            entries.len()
        )));
    }

    entries
        .into_iter()
        .zip(batch)
        .enumerate()
        .map(|(i, (entry, article))| {
            let expected = u32::try_from(i + 1).unwrap_or(u32::MAX);
            if entry.number != expected {
                return Err(ReporterError::MalformedResponse(format!(
                    "entry {} is numbered {}",
                    expected, entry.number
                )));
            }

            if entry.link.trim() != article.link.trim() {
                return Err(ReporterError::MalformedResponse(format!(
                    "entry {} links to {:?}, expected {:?}",
                    expected, entry.link, article.link
                )));
            }

            let narrative = entry.script.trim();
            if narrative.is_empty() {
                return Err(ReporterError::MalformedResponse(format!(
                    "entry {} has an empty script",
                    expected
                )));
            }

            let title = match entry.title.trim() {
                "" => article.title.clone(),
                t => t.to_string(),
            };

            Ok(Summary {
                ordinal: expected,
                title,
                link: article.link.clone(),
                narrative: narrative.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
