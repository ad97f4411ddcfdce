//! Currency store port.
//!
//! Adapters (Postgres, SQLite, InMemory) implement this trait.

use std::sync::Arc;

use crate::domain::{Currency, CurrencyId};
use crate::error::RepoError;

/// Durable keyed storage of Currency records with a secondary lookup by name.
///
/// Implementations MUST enforce name uniqueness on `save` themselves (unique
/// index or equivalent) and report a violation as [`RepoError::Conflict`].
/// The registry's find-then-save check is not atomic on its own.
#[async_trait::async_trait]
pub trait CurrencyStore: Send + Sync + 'static {
    /// Lists every stored currency, ordered by id.
    async fn find_all(&self) -> Result<Vec<Currency>, RepoError>;

    async fn find_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, RepoError>;

    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Currency>, RepoError>;

    /// Inserts an unsaved currency (assigning a fresh id) or replaces a saved one.
    async fn save(&self, currency: Currency) -> Result<Currency, RepoError>;

    async fn delete_by_id(&self, id: CurrencyId) -> Result<(), RepoError>;
}

#[async_trait::async_trait]
impl<S: CurrencyStore> CurrencyStore for Arc<S> {
    async fn find_all(&self) -> Result<Vec<Currency>, RepoError> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Currency>, RepoError> {
        (**self).find_by_name(name).await
    }

    async fn save(&self, currency: Currency) -> Result<Currency, RepoError> {
        (**self).save(currency).await
    }

    async fn delete_by_id(&self, id: CurrencyId) -> Result<(), RepoError> {
        (**self).delete_by_id(id).await
    }
}
