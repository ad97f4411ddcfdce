//! # Currency Hex
//!
//! Application layer and HTTP adapter for the currency service.
//!
//! ## Architecture
//!
//! - `registry/` - Currency CRUD with name-uniqueness and existence checks
//! - `conversion/` - Rate resolution (local `exchanges` map or external provider)
//! - `service/` - Façade the boundary layer drives
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: CurrencyStore` and `P: RateProvider`,
//! allowing different adapters to be injected.

pub mod conversion;
pub mod inbound;
pub mod openapi;
pub mod registry;
pub mod service;


pub use conversion::{ConversionEngine, ConversionSettings};
pub use registry::CurrencyRegistry;
pub use service::{CurrencyService, ServiceSettings};
