//! Request validation.
//!
//! Pure shape checks that run before any store or provider access. Each
//! validator returns the parsed value on success, so later stages never see
//! an unchecked payload.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{CurrencyDraft, CurrencyId};
use crate::dto::{ConvertRequest, CurrencyRequest};
use crate::error::DomainError;

/// Whether `code` is mandatory on currency payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// `name` and `code` are both required.
    #[default]
    Strict,
    /// Only `name` is required; a missing code is stored as empty.
    Lenient,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "lenient" => Ok(ValidationPolicy::Lenient),
            other => Err(format!("Unknown validation policy: {}", other)),
        }
    }
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Checks a create/update payload.
///
/// # Validation
/// - payload must be present
/// - `name` must be present and non-empty
/// - `code` must be present and non-empty under [`ValidationPolicy::Strict`]
/// - every `exchanges` entry needs a non-empty target and a rate > 0
pub fn validate_currency_payload(
    payload: Option<&CurrencyRequest>,
    policy: ValidationPolicy,
) -> Result<CurrencyDraft, DomainError> {
    let payload = payload.ok_or(DomainError::InvalidCurrencyRequest)?;
    let name = present(payload.name.as_ref()).ok_or(DomainError::InvalidCurrencyRequest)?;

    let code = match (present(payload.code.as_ref()), policy) {
        (Some(code), _) => code,
        (None, ValidationPolicy::Lenient) => "",
        (None, ValidationPolicy::Strict) => return Err(DomainError::InvalidCurrencyRequest),
    };

    let exchanges = payload.exchanges.clone().unwrap_or_default();
    for (target, rate) in &exchanges {
        if target.is_empty() {
            return Err(DomainError::InvalidCurrencyRequest);
        }
        if *rate <= Decimal::ZERO {
            return Err(DomainError::InvalidRate(target.clone()));
        }
    }

    Ok(CurrencyDraft {
        name: name.to_string(),
        code: code.to_string(),
        exchanges,
    })
}

/// Checks a currency id: present and strictly positive.
pub fn validate_id(id: Option<i64>) -> Result<CurrencyId, DomainError> {
    match id {
        Some(raw) if raw > 0 => Ok(CurrencyId::new(raw)),
        _ => Err(DomainError::InvalidCurrencyId),
    }
}

/// Checks a conversion payload: `from` and `to` non-empty, `amount` present.
pub fn validate_convert_payload(
    payload: Option<&ConvertRequest>,
) -> Result<Conversion, DomainError> {
    let payload = payload.ok_or(DomainError::InvalidConvertRequest)?;
    let from = present(payload.from.as_ref()).ok_or(DomainError::InvalidConvertRequest)?;
    let to = present(payload.to.as_ref()).ok_or(DomainError::InvalidConvertRequest)?;
    let amount = payload.amount.ok_or(DomainError::InvalidConvertRequest)?;

    Ok(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        amount,
    })
}

/// Checks a list of pair tags for the latest-quotes lookup.
pub fn validate_pair_list(tags: &[String]) -> Result<Vec<String>, DomainError> {
    if tags.is_empty() || tags.iter().any(|t| t.trim().is_empty()) {
        return Err(DomainError::InvalidPairList);
    }
    Ok(tags.iter().map(|t| t.trim().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_currency_payload() {
        let req = CurrencyRequest::new("USD", "USD").with_rate("EUR", dec!(0.9));
        let draft = validate_currency_payload(Some(&req), ValidationPolicy::Strict).unwrap();
        assert_eq!(draft.name(), "USD");
        assert_eq!(draft.code(), "USD");
        assert_eq!(draft.exchanges().get("EUR"), Some(&dec!(0.9)));
    }

    #[test]
    fn test_missing_payload_fails() {
        let result = validate_currency_payload(None, ValidationPolicy::Strict);
        assert_eq!(result, Err(DomainError::InvalidCurrencyRequest));
    }

    #[test]
    fn test_empty_name_fails() {
        let req = CurrencyRequest::new("", "USD");
        let result = validate_currency_payload(Some(&req), ValidationPolicy::Lenient);
        assert_eq!(result, Err(DomainError::InvalidCurrencyRequest));
    }

    #[test]
    fn test_missing_code_depends_on_policy() {
        let req = CurrencyRequest {
            name: Some("Dollar".into()),
            ..CurrencyRequest::default()
        };
        assert_eq!(
            validate_currency_payload(Some(&req), ValidationPolicy::Strict),
            Err(DomainError::InvalidCurrencyRequest)
        );
        let draft = validate_currency_payload(Some(&req), ValidationPolicy::Lenient).unwrap();
        assert_eq!(draft.code(), "");
    }

    #[test]
    fn test_non_positive_rate_fails() {
        let req = CurrencyRequest::new("USD", "USD").with_rate("EUR", dec!(0));
        assert_eq!(
            validate_currency_payload(Some(&req), ValidationPolicy::Strict),
            Err(DomainError::InvalidRate("EUR".into()))
        );
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(Some(1)), Ok(CurrencyId::new(1)));
        assert_eq!(validate_id(Some(0)), Err(DomainError::InvalidCurrencyId));
        assert_eq!(validate_id(Some(-5)), Err(DomainError::InvalidCurrencyId));
        assert_eq!(validate_id(None), Err(DomainError::InvalidCurrencyId));
    }

    #[test]
    fn test_convert_payload() {
        let req = ConvertRequest::new("USD", "EUR", dec!(-3));
        let conversion = validate_convert_payload(Some(&req)).unwrap();
        assert_eq!(conversion.amount, dec!(-3));

        let missing_amount = ConvertRequest {
            amount: None,
            ..req.clone()
        };
        assert_eq!(
            validate_convert_payload(Some(&missing_amount)),
            Err(DomainError::InvalidConvertRequest)
        );

        let empty_to = ConvertRequest {
            to: Some(String::new()),
            ..req
        };
        assert_eq!(
            validate_convert_payload(Some(&empty_to)),
            Err(DomainError::InvalidConvertRequest)
        );
        assert_eq!(validate_convert_payload(None), Err(DomainError::InvalidConvertRequest));
    }

    #[test]
    fn test_pair_list() {
        assert!(validate_pair_list(&[]).is_err());
        assert!(validate_pair_list(&["USD-BRL".into(), " ".into()]).is_err());
        assert_eq!(
            validate_pair_list(&[" USD-BRL ".into()]).unwrap(),
            vec!["USD-BRL".to_string()]
        );
    }
}
