//! Rate quotes and the knobs that decide how a conversion rate is resolved.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One provider quote for a currency pair.
///
/// Every field is optional: a quote that exists but lacks the selected field
/// is a different outcome from a pair the provider knows nothing about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateQuote {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub codein: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default, rename = "varBid")]
    pub var_bid: Option<Decimal>,
    #[serde(default, rename = "pctChange")]
    pub pct_change: Option<Decimal>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub create_date: Option<String>,
}

impl RateQuote {
    /// Quote carrying only a bid, which is what the default [`QuoteField`] reads.
    pub fn with_bid(bid: Decimal) -> Self {
        Self {
            bid: Some(bid),
            ..Self::default()
        }
    }

    /// Reads the designated quote field.
    pub fn field(&self, field: QuoteField) -> Option<Decimal> {
        match field {
            QuoteField::Bid => self.bid,
            QuoteField::Ask => self.ask,
            QuoteField::Low => self.low,
            QuoteField::High => self.high,
        }
    }
}

/// Which field of a [`RateQuote`] is used as the conversion rate.
///
/// Switching fields changes every provider-backed result, so it is a
/// deployment setting rather than a per-request choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteField {
    #[default]
    Bid,
    Ask,
    Low,
    High,
}

impl fmt::Display for QuoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuoteField::Bid => "bid",
            QuoteField::Ask => "ask",
            QuoteField::Low => "low",
            QuoteField::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for QuoteField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bid" => Ok(QuoteField::Bid),
            "ask" => Ok(QuoteField::Ask),
            "low" => Ok(QuoteField::Low),
            "high" => Ok(QuoteField::High),
            other => Err(format!("Unknown quote field: {}", other)),
        }
    }
}

/// How a (from, to) pair is spelled when asking the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairTagFormat {
    /// `"<from>-<to>"`
    #[default]
    Dash,
    /// `"<to>_<from>"`
    ReversedUnderscore,
}

impl FromStr for PairTagFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dash" | "from-to" => Ok(PairTagFormat::Dash),
            "reversed_underscore" | "to_from" => Ok(PairTagFormat::ReversedUnderscore),
            other => Err(format!("Unknown pair tag format: {}", other)),
        }
    }
}

/// Key identifying a currency pair for external lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairTag(String);

impl PairTag {
    pub fn new(from: &str, to: &str, format: PairTagFormat) -> Self {
        match format {
            PairTagFormat::Dash => Self(format!("{}-{}", from, to)),
            PairTagFormat::ReversedUnderscore => Self(format!("{}_{}", to, from)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag with separators removed, e.g. `USD-BRL` -> `USDBRL`.
    pub fn compact(&self) -> String {
        compact_tag(&self.0)
    }
}

impl fmt::Display for PairTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips pair separators from a raw tag.
pub fn compact_tag(tag: &str) -> String {
    tag.chars().filter(|c| *c != '-' && *c != '_').collect()
}

/// Where the conversion engine takes its rate from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// The `exchanges` map stored on the source currency.
    #[default]
    Local,
    /// The external rate provider.
    Provider,
}

impl FromStr for RateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(RateSource::Local),
            "provider" | "external" => Ok(RateSource::Provider),
            other => Err(format!("Unknown rate source: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pair_tag_formats() {
        assert_eq!(PairTag::new("USD", "BRL", PairTagFormat::Dash).as_str(), "USD-BRL");
        assert_eq!(
            PairTag::new("USD", "BRL", PairTagFormat::ReversedUnderscore).as_str(),
            "BRL_USD"
        );
        assert_eq!(PairTag::new("USD", "BRL", PairTagFormat::Dash).compact(), "USDBRL");
    }

    #[test]
    fn test_quote_field_selection() {
        let quote = RateQuote {
            bid: Some(dec!(5.36)),
            low: Some(dec!(5.30)),
            ..RateQuote::default()
        };
        assert_eq!(quote.field(QuoteField::Bid), Some(dec!(5.36)));
        assert_eq!(quote.field(QuoteField::Low), Some(dec!(5.30)));
        assert_eq!(quote.field(QuoteField::Ask), None);
    }

    #[test]
    fn test_quote_deserializes_string_decimals() {
        let json = r#"{"code":"USD","codein":"BRL","bid":"5.3612","varBid":"-0.01","create_date":"2024-01-01 10:00:00"}"#;
        let quote: RateQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.bid, Some(dec!(5.3612)));
        assert_eq!(quote.var_bid, Some(dec!(-0.01)));
        assert_eq!(quote.low, None);
    }

    #[test]
    fn test_config_parsing() {
        assert_eq!("LOW".parse::<QuoteField>().unwrap(), QuoteField::Low);
        assert_eq!("to_from".parse::<PairTagFormat>().unwrap(), PairTagFormat::ReversedUnderscore);
        assert_eq!("provider".parse::<RateSource>().unwrap(), RateSource::Provider);
        assert!("mid".parse::<QuoteField>().is_err());
    }
}
