//! Currency Registry
//!
//! CRUD over Currency records. Name uniqueness and existence are checked at
//! the start of every mutation; the store's own unique index backs the check
//! up when two writers race.

use std::sync::Arc;

use currency_types::validation::{validate_currency_payload, validate_id};
use currency_types::{
    AppError, Currency, CurrencyId, CurrencyRequest, CurrencyResponse, CurrencyStore, RepoError,
    ValidationPolicy,
};

/// Owns every Currency instance; the only component that builds or mutates them.
pub struct CurrencyRegistry<S: CurrencyStore> {
    store: Arc<S>,
    policy: ValidationPolicy,
}

impl<S: CurrencyStore> CurrencyRegistry<S> {
    pub fn new(store: Arc<S>, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// Lists every stored currency as `"<id> - <name>"`.
    pub async fn list(&self) -> Result<Vec<CurrencyResponse>, AppError> {
        let currencies = self.store.find_all().await?;
        Ok(currencies
            .iter()
            .map(|c| CurrencyResponse { label: c.label() })
            .collect())
    }

    /// Creates a currency and returns its fresh id.
    pub async fn create(&self, payload: Option<&CurrencyRequest>) -> Result<CurrencyId, AppError> {
        let draft = validate_currency_payload(payload, self.policy)?;

        if self.store.find_by_name(draft.name()).await?.is_some() {
            return Err(AppError::AlreadyExists(draft.name().to_string()));
        }

        let saved = self.store.save(Currency::from_draft(draft)).await?;
        let id = saved
            .id()
            .ok_or_else(|| AppError::Internal("Store returned an unsaved currency".into()))?;

        tracing::info!(currency_id = %id, name = saved.name(), "Currency created");
        Ok(id)
    }

    /// Replaces name, code and exchanges of an existing currency.
    pub async fn update(&self, id: i64, payload: Option<&CurrencyRequest>) -> Result<(), AppError> {
        let id = validate_id(Some(id))?;
        let draft = validate_currency_payload(payload, self.policy)?;

        let mut current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        if current.name() != draft.name() {
            if let Some(other) = self.store.find_by_name(draft.name()).await? {
                if other.id() != Some(id) {
                    return Err(AppError::AlreadyExists(draft.name().to_string()));
                }
            }
        }

        current.replace(draft);
        self.store.save(current).await.map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(currency_id = %id, "Currency updated");
        Ok(())
    }

    /// Deletes a currency. Other currencies' exchange entries naming it are left alone.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let id = validate_id(Some(id))?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        self.store.delete_by_id(id).await?;

        tracing::info!(currency_id = %id, name = existing.name(), "Currency deleted");
        Ok(())
    }
}
