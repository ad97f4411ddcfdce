//! Exchange rate provider port.
//!
//! This trait defines the interface for external rate feeds.
//! Implementations can be HTTP clients, static tables, test doubles, etc.

use std::collections::HashMap;

use crate::domain::{PairTag, RateQuote};

/// Error type for rate provider operations.
///
/// These are transport-level failures. "The provider has no data for this
/// pair" is not an error; it is an absent map entry.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Rate provider timed out")]
    Timeout,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Port trait for external exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetches the latest quotes for the given pair tags.
    ///
    /// The returned map is keyed by the tags exactly as requested; tags the
    /// provider knows nothing about are absent.
    async fn fetch_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, ProviderError>;

    /// Fetches the quote for a single pair, `None` when the provider has no entry.
    async fn get_rate(&self, tag: &PairTag) -> Result<Option<RateQuote>, ProviderError> {
        let mut quotes = self.fetch_quotes(&[tag.as_str().to_string()]).await?;
        Ok(quotes.remove(tag.as_str()))
    }
}
