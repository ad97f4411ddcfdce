//! Conversion Engine
//!
//! Resolves one exchange rate and multiplies. The rate comes either from the
//! source currency's stored `exchanges` map or from the external provider,
//! depending on [`RateSource`]. Read-only: nothing here writes to the store.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use currency_types::validation::{Conversion, validate_convert_payload, validate_pair_list};
use currency_types::{
    AppError, ConvertRequest, ConvertResponse, CurrencyStore, PairTag, PairTagFormat, QuoteField,
    RateProvider, RateQuote, RateSource,
};

/// Deployment choices for rate resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSettings {
    pub source: RateSource,
    pub pair_format: PairTagFormat,
    pub quote_field: QuoteField,
}

pub struct ConversionEngine<S: CurrencyStore, P: RateProvider> {
    store: Arc<S>,
    provider: P,
    settings: ConversionSettings,
}

impl<S: CurrencyStore, P: RateProvider> ConversionEngine<S, P> {
    pub fn new(store: Arc<S>, provider: P, settings: ConversionSettings) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> ConversionSettings {
        self.settings
    }

    /// Converts using the configured [`RateSource`].
    pub async fn convert(
        &self,
        payload: Option<&ConvertRequest>,
    ) -> Result<ConvertResponse, AppError> {
        match self.settings.source {
            RateSource::Local => self.convert_local(payload).await,
            RateSource::Provider => self.convert_via_provider(payload).await,
        }
    }

    /// Strategy A: rate stored on the `from` currency, keyed by the `to` name.
    pub async fn convert_local(
        &self,
        payload: Option<&ConvertRequest>,
    ) -> Result<ConvertResponse, AppError> {
        let Conversion { from, to, amount } = validate_convert_payload(payload)?;

        let currency = self
            .store
            .find_by_name(&from)
            .await?
            .ok_or_else(|| AppError::CoinNotFound(from.clone()))?;

        let rate = currency
            .rate_to(&to)
            .ok_or_else(|| AppError::exchange_not_found(&from, &to))?;

        tracing::debug!(%from, %to, %rate, "Resolved local rate");
        multiply(amount, rate)
    }

    /// Strategy B: rate read from the provider's quote for the pair tag.
    pub async fn convert_via_provider(
        &self,
        payload: Option<&ConvertRequest>,
    ) -> Result<ConvertResponse, AppError> {
        let Conversion { from, to, amount } = validate_convert_payload(payload)?;
        let tag = PairTag::new(&from, &to, self.settings.pair_format);

        let quote = self
            .provider
            .get_rate(&tag)
            .await
            .inspect_err(|e| tracing::warn!(%tag, error = %e, "Rate provider call failed"))?
            .ok_or_else(|| AppError::conversion_data_not_found(&from, &to))?;

        let rate = quote
            .field(self.settings.quote_field)
            .ok_or_else(|| AppError::exchange_not_found(&from, &to))?;

        tracing::debug!(%tag, field = %self.settings.quote_field, %rate, "Resolved provider rate");
        multiply(amount, rate)
    }

    /// Latest provider quotes for the given pair tags, passed through as-is.
    pub async fn latest_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, AppError> {
        let tags = validate_pair_list(tags)?;
        Ok(self.provider.fetch_quotes(&tags).await?)
    }
}

/// Exact decimal product; the result carries the scale of both operands.
fn multiply(amount: Decimal, rate: Decimal) -> Result<ConvertResponse, AppError> {
    amount
        .checked_mul(rate)
        .map(|amount| ConvertResponse { amount })
        .ok_or_else(|| AppError::InvalidRequest("Converted amount is out of range".into()))
}
