//! Domain models for the currency service.

pub mod currency;
pub mod rate;

pub use currency::{Currency, CurrencyDraft, CurrencyId, Exchanges};
pub use rate::{PairTag, PairTagFormat, QuoteField, RateQuote, RateSource};
