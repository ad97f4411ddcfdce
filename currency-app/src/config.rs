//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;
use currency_hex::{ConversionSettings, ServiceSettings};
use currency_types::{PairTagFormat, QuoteField, RateSource, ValidationPolicy};
use rate_feed::DEFAULT_BASE_URL;

/// `RATE_PROVIDER_URL` value that selects the built-in quote table.
pub const STATIC_PROVIDER: &str = "static";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_acquire_timeout: Duration,
    pub rate_provider_url: String,
    pub rate_provider_timeout: Duration,
    pub rate_limit_per_minute: u32,
    /// Key the rate limiter on `X-Forwarded-For` (set behind a proxy only)
    pub trust_forwarded_for: bool,
    pub settings: ServiceSettings,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000").parse().context("PORT must be a port number")?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let db_acquire_timeout = seconds(&var("DB_ACQUIRE_TIMEOUT_SECS", "5"))
            .context("DB_ACQUIRE_TIMEOUT_SECS must be a number of seconds")?;
        let rate_provider_timeout = seconds(&var("RATE_PROVIDER_TIMEOUT_SECS", "5"))
            .context("RATE_PROVIDER_TIMEOUT_SECS must be a number of seconds")?;

        let rate_limit_per_minute = var("RATE_LIMIT_PER_MINUTE", "100")
            .parse()
            .context("RATE_LIMIT_PER_MINUTE must be a positive integer")?;
        let trust_forwarded_for = var("TRUST_FORWARDED_FOR", "false")
            .parse()
            .context("TRUST_FORWARDED_FOR must be true or false")?;

        let source: RateSource = var("RATE_SOURCE", "local")
            .parse()
            .map_err(anyhow::Error::msg)?;
        let quote_field: QuoteField = var("RATE_QUOTE_FIELD", "bid")
            .parse()
            .map_err(anyhow::Error::msg)?;
        let pair_format: PairTagFormat = var("PAIR_TAG_FORMAT", "dash")
            .parse()
            .map_err(anyhow::Error::msg)?;
        let policy: ValidationPolicy = var("CODE_POLICY", "strict")
            .parse()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            port,
            database_url,
            db_acquire_timeout,
            rate_provider_url: var("RATE_PROVIDER_URL", DEFAULT_BASE_URL),
            rate_provider_timeout,
            rate_limit_per_minute,
            trust_forwarded_for,
            settings: ServiceSettings {
                policy,
                conversion: ConversionSettings {
                    source,
                    pair_format,
                    quote_field,
                },
            },
        })
    }

    pub fn uses_static_rates(&self) -> bool {
        self.rate_provider_url.eq_ignore_ascii_case(STATIC_PROVIDER)
    }
}

fn seconds(raw: &str) -> Result<Duration, std::num::ParseIntError> {
    raw.parse().map(Duration::from_secs)
}
