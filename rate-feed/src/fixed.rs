//! Static quote table.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use currency_types::{PairTag, PairTagFormat, ProviderError, RateProvider, RateQuote};

/// Rate provider answering from a fixed table of quotes.
///
/// Tags are matched exactly, so the table must be built with the same
/// [`PairTagFormat`] the engine is configured with.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    quotes: HashMap<String, RateQuote>,
}

/// (from, to, bid) pairs served by [`StaticRateProvider::development`].
const DEVELOPMENT_BIDS: &[(&str, &str, i64, u32)] = &[
    ("USD", "EUR", 92, 2),
    ("EUR", "USD", 1087, 3),
    ("USD", "GBP", 79, 2),
    ("GBP", "USD", 1266, 3),
    ("USD", "INR", 8312, 2),
    ("INR", "USD", 1203, 5),
    ("USD", "BRL", 536, 2),
];

impl StaticRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small table of plausible quotes keyed in `"<from>-<to>"` form.
    pub fn development() -> Self {
        Self::development_with(PairTagFormat::Dash)
    }

    /// Same table as [`StaticRateProvider::development`], keyed in `format`.
    pub fn development_with(format: PairTagFormat) -> Self {
        DEVELOPMENT_BIDS
            .iter()
            .fold(Self::new(), |table, &(from, to, mantissa, scale)| {
                let tag = PairTag::new(from, to, format);
                let quote = RateQuote {
                    code: Some(from.to_string()),
                    codein: Some(to.to_string()),
                    ..RateQuote::with_bid(Decimal::new(mantissa, scale))
                };
                table.with_quote(tag.as_str(), quote)
            })
    }

    /// Adds (or replaces) the quote for `tag`.
    pub fn with_quote(mut self, tag: impl Into<String>, quote: RateQuote) -> Self {
        self.quotes.insert(tag.into(), quote);
        self
    }

    /// Adds a quote carrying only a bid.
    pub fn with_bid(self, tag: impl Into<String>, bid: Decimal) -> Self {
        self.with_quote(tag, RateQuote::with_bid(bid))
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, ProviderError> {
        Ok(tags
            .iter()
            .filter_map(|tag| self.quotes.get(tag).map(|q| (tag.clone(), q.clone())))
            .collect())
    }
}
