//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Request fields are optional at the wire level so the validator, not the
//! deserializer, decides what counts as missing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Exchanges;

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create or update a currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CurrencyRequest {
    /// Unique currency name
    #[schema(example = "USD")]
    #[serde(default)]
    pub name: Option<String>,
    /// Short identifying tag
    #[schema(example = "USD")]
    #[serde(default)]
    pub code: Option<String>,
    /// Local rates from this currency, keyed by target currency name
    #[schema(value_type = Option<Object>, example = json!({"EUR": "0.9"}))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchanges: Option<Exchanges>,
}

impl CurrencyRequest {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: Some(code.into()),
            exchanges: None,
        }
    }

    /// Adds a local rate to `target`.
    pub fn with_rate(mut self, target: impl Into<String>, rate: Decimal) -> Self {
        self.exchanges
            .get_or_insert_with(Exchanges::new)
            .insert(target.into(), rate);
        self
    }
}

/// Display projection of a stored currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyResponse {
    /// `"<id> - <name>"`
    #[schema(example = "1 - USD")]
    pub label: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ConvertRequest {
    /// Source currency
    #[schema(example = "USD")]
    #[serde(default)]
    pub from: Option<String>,
    /// Target currency
    #[schema(example = "BRL")]
    #[serde(default)]
    pub to: Option<String>,
    /// Amount in the source currency
    #[schema(value_type = Option<String>, example = "10")]
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl ConvertRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            amount: Some(amount),
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    /// Converted amount in the target currency
    #[schema(value_type = String, example = "53.60")]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_numeric_amount_keeps_every_digit() {
        let req: ConvertRequest =
            serde_json::from_str(r#"{"from":"USD","to":"EUR","amount":12345678901234567.89}"#)
                .unwrap();
        assert_eq!(req.amount, Some(dec!(12345678901234567.89)));
    }

    #[test]
    fn test_numeric_rate_keeps_every_digit() {
        let req: CurrencyRequest = serde_json::from_str(
            r#"{"name":"USD","code":"US","exchanges":{"EUR":0.123456789012345678901}}"#,
        )
        .unwrap();
        let exchanges = req.exchanges.unwrap();
        assert_eq!(exchanges["EUR"], dec!(0.123456789012345678901));
        assert_eq!(exchanges["EUR"].scale(), 21);
    }

    #[test]
    fn test_string_decimals_still_accepted() {
        let req: ConvertRequest =
            serde_json::from_str(r#"{"from":"USD","to":"EUR","amount":"10.50"}"#).unwrap();
        assert_eq!(req.amount, Some(dec!(10.50)));
    }

    #[test]
    fn test_response_amount_serializes_as_string() {
        let body = serde_json::to_string(&ConvertResponse { amount: dec!(53.60) }).unwrap();
        assert_eq!(body, r#"{"amount":"53.60"}"#);
    }
}
