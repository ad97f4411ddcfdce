//! Error types for the currency service.

use crate::domain::CurrencyId;
use crate::ports::ProviderError;

/// Domain-level errors (malformed input caught by the validator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid CurrencyRequest")]
    InvalidCurrencyRequest,

    #[error("Invalid Currency ID")]
    InvalidCurrencyId,

    #[error("Invalid ConvertCurrencyRequest")]
    InvalidConvertRequest,

    #[error("Invalid exchange rate for {0}: rates must be positive")]
    InvalidRate(String),

    #[error("Invalid pair list")]
    InvalidPairList,
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors returned by every core operation.
///
/// Each variant is a distinct failure kind so the boundary layer can map it
/// without reading the message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Coin not found: {0}")]
    NotFound(CurrencyId),

    #[error("Coin already exists: {0}")]
    AlreadyExists(String),

    #[error("Coin not found: {0}")]
    CoinNotFound(String),

    #[error("Exchange rate not found for {from} to {to}")]
    ExchangeNotFound { from: String, to: String },

    #[error("Currency conversion data not found for {from} to {to}")]
    ConversionDataNotFound { from: String, to: String },

    #[error("Rate provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable tag for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::CoinNotFound(_) => "COIN_NOT_FOUND",
            AppError::ExchangeNotFound { .. } => "EXCHANGE_NOT_FOUND",
            AppError::ConversionDataNotFound { .. } => "CONVERSION_DATA_NOT_FOUND",
            AppError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn exchange_not_found(from: &str, to: &str) -> Self {
        AppError::ExchangeNotFound {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn conversion_data_not_found(from: &str, to: &str) -> Self {
        AppError::ConversionDataNotFound {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict(name) => AppError::AlreadyExists(name),
            RepoError::NotFound => AppError::Internal("Stored record vanished".into()),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_already_exists() {
        let err: AppError = RepoError::Conflict("USD".into()).into();
        assert!(matches!(err, AppError::AlreadyExists(ref name) if name == "USD"));
        assert_eq!(err.kind(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_domain_error_maps_to_invalid_request() {
        let err: AppError = DomainError::InvalidCurrencyId.into();
        assert_eq!(err.to_string(), "Invalid Currency ID");
        assert_eq!(err.kind(), "INVALID_REQUEST");
    }

    #[test]
    fn test_provider_timeout_is_unavailable() {
        let err: AppError = ProviderError::Timeout.into();
        assert!(matches!(err, AppError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_exchange_not_found_message() {
        let err = AppError::exchange_not_found("USD", "GBP");
        assert_eq!(err.to_string(), "Exchange rate not found for USD to GBP");
    }
}
