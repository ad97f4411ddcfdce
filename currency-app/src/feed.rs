//! Rate provider selection.

use std::collections::HashMap;

use async_trait::async_trait;
use currency_types::{ProviderError, RateProvider, RateQuote};
use rate_feed::{AwesomeApiProvider, StaticRateProvider};

use crate::config::Config;

/// The rate provider picked from `RATE_PROVIDER_URL`.
pub enum RateFeed {
    Http(AwesomeApiProvider),
    Static(StaticRateProvider),
}

impl RateFeed {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.uses_static_rates() {
            let format = config.settings.conversion.pair_format;
            return Ok(RateFeed::Static(StaticRateProvider::development_with(format)));
        }

        let provider =
            AwesomeApiProvider::new(&config.rate_provider_url, config.rate_provider_timeout)?;
        Ok(RateFeed::Http(provider))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RateFeed::Http(_) => "http",
            RateFeed::Static(_) => "static",
        }
    }
}

#[async_trait]
impl RateProvider for RateFeed {
    async fn fetch_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, ProviderError> {
        match self {
            RateFeed::Http(provider) => provider.fetch_quotes(tags).await,
            RateFeed::Static(provider) => provider.fetch_quotes(tags).await,
        }
    }
}
