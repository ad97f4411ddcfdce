//! # Rate Feed
//!
//! Adapters implementing the [`RateProvider`](currency_types::RateProvider) port.
//!
//! - [`AwesomeApiProvider`] - HTTP client for an AwesomeAPI-style
//!   `/json/last/{pairs}` endpoint
//! - [`StaticRateProvider`] - fixed quote table for development and testing
//!
//! # Example
//! ```
//! use currency_types::{PairTag, PairTagFormat, RateProvider};
//! use rate_feed::StaticRateProvider;
//!
//! # async fn demo() {
//! let provider = StaticRateProvider::development();
//! let tag = PairTag::new("USD", "EUR", PairTagFormat::Dash);
//! let quote = provider.get_rate(&tag).await.unwrap();
//! assert!(quote.is_some());
//! # }
//! ```

mod awesome;
mod fixed;

pub use awesome::{AwesomeApiProvider, DEFAULT_BASE_URL};
pub use fixed::StaticRateProvider;
