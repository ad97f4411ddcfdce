//! # Currency Types
//!
//! Domain types and port traits for the currency catalog service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Currency, rate quotes, conversion settings)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `validation/` - Shape checks run before any store or provider access
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod validation;

// Re-export commonly used types
pub use domain::{
    Currency, CurrencyDraft, CurrencyId, Exchanges, PairTag, PairTagFormat, QuoteField,
    RateQuote, RateSource,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{CurrencyStore, ProviderError, RateProvider};
pub use validation::{Conversion, ValidationPolicy};
