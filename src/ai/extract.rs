//! Structured-output extraction from free-form model replies.
//!
//! Models are asked for bare JSON but routinely wrap it in a Markdown code
//! fence. The payload is located in priority order:
//!
//! 1. the first fence labeled `json` (case-insensitive),
//! 2. otherwise the first fence of any kind (its info string is dropped),
//! 3. otherwise the whole reply.
//!
//! An opening fence without a closing one runs to the end of the reply.
//! Any triple backtick counts as a fence, including one inside a JSON string
//! of an otherwise unfenced reply; such replies are rejected as malformed.

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::errors::ReporterError;

/// Where the payload was found in the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction<'a> {
    LabeledFence(&'a str),
    Fence(&'a str),
    Unfenced(&'a str),
}

impl<'a> Extraction<'a> {
    /// The trimmed payload text.
    #[must_use]
    pub fn payload(&self) -> &'a str {
        match self {
            Extraction::LabeledFence(s) | Extraction::Fence(s) | Extraction::Unfenced(s) => s,
        }
    }
}

static LABELED_FENCE_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*(?i:json)\b[ \t]*\r?\n?(.*?)(?:```|\z)").expect("static regex compile")
});

static ANY_FENCE_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n?(.*?)(?:```|\z)").expect("static regex compile")
});

#[must_use]
pub fn extract_payload(raw: &str) -> Extraction<'_> {
    if let Some(body) = first_capture(&LABELED_FENCE_RE, raw) {
        return Extraction::LabeledFence(body.trim());
    }
    if let Some(body) = first_capture(&ANY_FENCE_RE, raw) {
        return Extraction::Fence(body.trim());
    }
    Extraction::Unfenced(raw.trim())
}

fn first_capture<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the payload and deserialize it.
///
/// # Errors
///
/// Returns [`ReporterError::MalformedResponse`] if the extracted text is
/// empty or does not deserialize into `T`.
pub fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, ReporterError> {
    let extraction = extract_payload(raw);
    let payload = extraction.payload();
    if payload.is_empty() {
        return Err(ReporterError::MalformedResponse(
            "model reply contains no structured payload".to_string(),
        ));
    }

    serde_json::from_str(payload).map_err(|e| {
        ReporterError::MalformedResponse(format!("payload is not valid JSON: {}", e))
    })
}
