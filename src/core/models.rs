use crate::errors::ReporterError;

/// A normalized feed entry. Built once by the fetcher and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub raw_summary: String,
    pub published_at: String,
}

/// Articles in feed order. Position `i` becomes ordinal `i + 1`.
pub type ArticleBatch = Vec<Article>;

/// One stylized narrative, aligned 1:1 with an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub ordinal: u32,
    pub title: String,
    pub link: String,
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub delivered: bool,
    pub channel_id: String,
    pub message_timestamp: Option<String>,
    pub provider_error: Option<String>,
}

impl DeliveryResult {
    #[must_use]
    pub fn delivered(channel_id: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            delivered: true,
            channel_id: channel_id.into(),
            message_timestamp: Some(ts.into()),
            provider_error: None,
        }
    }

    #[must_use]
    pub fn rejected(channel_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            delivered: false,
            channel_id: channel_id.into(),
            message_timestamp: None,
            provider_error: Some(error.into()),
        }
    }

    /// Turn a provider rejection into a [`ReporterError::Delivery`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error detail when the message was not delivered.
    pub fn into_result(self) -> Result<Self, ReporterError> {
        if self.delivered {
            Ok(self)
        } else {
            Err(ReporterError::Delivery(
                self.provider_error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
