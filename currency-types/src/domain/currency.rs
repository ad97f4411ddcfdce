//! Currency domain model.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Directional local rates: target currency name -> rate from this currency.
pub type Exchanges = BTreeMap<String, Decimal>;

/// Unique identifier for a Currency, assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CurrencyId(i64);

impl CurrencyId {
    /// Wraps a raw identifier. Positivity is checked by the validator, not here.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CurrencyId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A validated create/update payload.
///
/// Only the validator builds these, so every draft has a non-empty name and
/// strictly positive rates.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyDraft {
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) exchanges: Exchanges,
}

impl CurrencyDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn exchanges(&self) -> &Exchanges {
        &self.exchanges
    }
}

/// A named, uniquely identified unit of value.
///
/// Fields are private: a Currency is only built from a validated draft or
/// reconstructed by a store adapter, and only renamed through [`Currency::replace`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    id: Option<CurrencyId>,
    name: String,
    code: String,
    #[serde(default)]
    exchanges: Exchanges,
}

impl Currency {
    /// Creates an unsaved currency from a validated draft.
    pub fn from_draft(draft: CurrencyDraft) -> Self {
        Self {
            id: None,
            name: draft.name,
            code: draft.code,
            exchanges: draft.exchanges,
        }
    }

    /// Creates a currency with all fields specified (for database reconstruction).
    pub fn from_parts(id: CurrencyId, name: String, code: String, exchanges: Exchanges) -> Self {
        Self {
            id: Some(id),
            name,
            code,
            exchanges,
        }
    }

    /// Returns the currency with the store-assigned id.
    ///
    /// An id that is already assigned is kept.
    pub fn with_id(mut self, id: CurrencyId) -> Self {
        self.id.get_or_insert(id);
        self
    }

    /// `None` until the store has persisted the record.
    pub fn id(&self) -> Option<CurrencyId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn exchanges(&self) -> &Exchanges {
        &self.exchanges
    }

    /// Local rate from this currency to `target`, if one is stored.
    pub fn rate_to(&self, target: &str) -> Option<Decimal> {
        self.exchanges.get(target).copied()
    }

    /// Replaces name, code and exchanges wholesale. The id is untouched.
    pub fn replace(&mut self, draft: CurrencyDraft) {
        self.name = draft.name;
        self.code = draft.code;
        self.exchanges = draft.exchanges;
    }

    /// Display label used by listings: `"<id> - <name>"`.
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("{} - {}", id, self.name),
            None => format!("unsaved - {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(name: &str) -> CurrencyDraft {
        CurrencyDraft {
            name: name.to_string(),
            code: "USD".to_string(),
            exchanges: Exchanges::from([("EUR".to_string(), dec!(0.9))]),
        }
    }

    #[test]
    fn test_from_draft_is_unsaved() {
        let currency = Currency::from_draft(draft("Dollar"));
        assert_eq!(currency.id(), None);
        assert_eq!(currency.name(), "Dollar");
        assert_eq!(currency.rate_to("EUR"), Some(dec!(0.9)));
        assert_eq!(currency.rate_to("GBP"), None);
    }

    #[test]
    fn test_with_id_keeps_existing_id() {
        let currency = Currency::from_draft(draft("Dollar"))
            .with_id(CurrencyId::new(7))
            .with_id(CurrencyId::new(9));
        assert_eq!(currency.id(), Some(CurrencyId::new(7)));
    }

    #[test]
    fn test_replace_keeps_id() {
        let mut currency =
            Currency::from_parts(CurrencyId::new(3), "Dollar".into(), "USD".into(), Exchanges::new());
        currency.replace(draft("Greenback"));
        assert_eq!(currency.id(), Some(CurrencyId::new(3)));
        assert_eq!(currency.name(), "Greenback");
        assert_eq!(currency.exchanges().len(), 1);
    }

    #[test]
    fn test_label() {
        let currency =
            Currency::from_parts(CurrencyId::new(1), "USD".into(), "USD".into(), Exchanges::new());
        assert_eq!(currency.label(), "1 - USD");
    }

    #[test]
    fn test_currency_id_parse() {
        assert_eq!("42".parse::<CurrencyId>().unwrap(), CurrencyId::new(42));
        assert!("abc".parse::<CurrencyId>().is_err());
    }
}
