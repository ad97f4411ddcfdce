//! In-memory store adapter.
//!
//! Backs local runs (`memory://`) and tests. Names are reserved through a
//! `DashMap` entry, so the uniqueness check and the write happen under the
//! same shard lock.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use currency_types::{Currency, CurrencyId, CurrencyStore, RepoError};

/// Process-local store with a unique name index.
pub struct InMemoryStore {
    next_id: AtomicI64,
    records: DashMap<CurrencyId, Currency>,
    names: DashMap<String, CurrencyId>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            records: DashMap::new(),
            names: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Claims `name` for `id`. Fails if another record holds it.
    fn reserve_name(&self, name: &str, id: CurrencyId) -> Result<(), RepoError> {
        match self.names.entry(name.to_string()) {
            Entry::Occupied(owner) if *owner.get() != id => {
                Err(RepoError::Conflict(name.to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_name(&self, name: &str, id: CurrencyId) {
        self.names.remove_if(name, |_, owner| *owner == id);
    }

    fn insert(&self, currency: Currency) -> Result<Currency, RepoError> {
        let id = CurrencyId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.reserve_name(currency.name(), id)?;

        let saved = currency.with_id(id);
        self.records.insert(id, saved.clone());
        Ok(saved)
    }

    /// Holds the record's shard lock across the name swap so a concurrent
    /// delete either runs first (`NotFound`) or releases the final name.
    /// Lock order is `records` then `names`; no path takes them the other way.
    fn replace(&self, id: CurrencyId, currency: Currency) -> Result<Currency, RepoError> {
        let mut slot = self.records.get_mut(&id).ok_or(RepoError::NotFound)?;

        self.reserve_name(currency.name(), id)?;
        if slot.name() != currency.name() {
            self.release_name(slot.name(), id);
        }

        *slot = currency.clone();
        Ok(currency)
    }
}

#[async_trait]
impl CurrencyStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Currency>, RepoError> {
        let mut all: Vec<(CurrencyId, Currency)> = self
            .records
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        Ok(all.into_iter().map(|(_, currency)| currency).collect())
    }

    async fn find_by_id(&self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        Ok(self.records.get(&id).map(|c| c.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Currency>, RepoError> {
        let id = match self.names.get(name) {
            Some(owner) => *owner.value(),
            None => return Ok(None),
        };
        self.find_by_id(id).await
    }

    async fn save(&self, currency: Currency) -> Result<Currency, RepoError> {
        match currency.id() {
            None => self.insert(currency),
            Some(id) => self.replace(id, currency),
        }
    }

    async fn delete_by_id(&self, id: CurrencyId) -> Result<(), RepoError> {
        if let Some((_, removed)) = self.records.remove(&id) {
            self.release_name(removed.name(), id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use currency_types::validation::{ValidationPolicy, validate_currency_payload};
    use currency_types::CurrencyRequest;
    use rust_decimal_macros::dec;

    use super::*;

    fn currency(name: &str) -> Currency {
        let req = CurrencyRequest::new(name, name).with_rate("EUR", dec!(0.9));
        Currency::from_draft(validate_currency_payload(Some(&req), ValidationPolicy::Strict).unwrap())
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.save(currency("USD")).await.unwrap();
        let b = store.save(currency("BRL")).await.unwrap();

        assert_eq!(a.id(), Some(CurrencyId::new(1)));
        assert_eq!(b.id(), Some(CurrencyId::new(2)));
        assert_eq!(store.find_by_name("BRL").await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = InMemoryStore::new();
        store.save(currency("USD")).await.unwrap();

        let result = store.save(currency("USD")).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_frees_old_name() {
        let store = InMemoryStore::new();
        let saved = store.save(currency("USD")).await.unwrap();
        let id = saved.id().unwrap();

        let renamed = Currency::from_parts(id, "Dollar".into(), "USD".into(), Default::default());
        store.save(renamed).await.unwrap();

        assert!(store.find_by_name("USD").await.unwrap().is_none());
        assert_eq!(store.find_by_name("Dollar").await.unwrap().unwrap().id(), Some(id));
        store.save(currency("USD")).await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_onto_taken_name_conflicts() {
        let store = InMemoryStore::new();
        store.save(currency("USD")).await.unwrap();
        let brl = store.save(currency("BRL")).await.unwrap();

        let clash = Currency::from_parts(brl.id().unwrap(), "USD".into(), "BRL".into(), Default::default());
        let result = store.save(clash).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert_eq!(store.find_by_name("BRL").await.unwrap(), Some(brl));
    }

    #[tokio::test]
    async fn test_replace_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let ghost = Currency::from_parts(CurrencyId::new(9), "X".into(), "X".into(), Default::default());
        assert!(matches!(store.save(ghost).await, Err(RepoError::NotFound)));
        assert!(store.find_by_name("X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_releases_name() {
        let store = InMemoryStore::new();
        let saved = store.save(currency("USD")).await.unwrap();

        store.delete_by_id(saved.id().unwrap()).await.unwrap();

        assert!(store.is_empty());
        assert!(store.find_by_name("USD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_names_unique() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.save(currency("USD")).await }));
        }

        let mut saved = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                saved += 1;
            }
        }

        assert_eq!(saved, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_delete_and_rename_leave_no_orphan_name() {
        let store = Arc::new(InMemoryStore::new());

        for round in 0..200 {
            let old_name = format!("OLD{round}");
            let new_name = format!("NEW{round}");
            let id = store.save(currency(&old_name)).await.unwrap().id().unwrap();

            let deleter = {
                let store = store.clone();
                tokio::spawn(async move { store.delete_by_id(id).await })
            };
            let renamer = {
                let store = store.clone();
                let renamed =
                    Currency::from_parts(id, new_name.clone(), "X".into(), Default::default());
                tokio::spawn(async move { store.save(renamed).await })
            };

            deleter.await.unwrap().unwrap();
            let renamed = renamer.await.unwrap();
            assert!(matches!(renamed, Ok(_) | Err(RepoError::NotFound)));

            assert!(store.find_by_id(id).await.unwrap().is_none());
            assert!(store.find_by_name(&old_name).await.unwrap().is_none());
            assert!(store.find_by_name(&new_name).await.unwrap().is_none());
            assert!(!store.names.contains_key(&old_name));
            assert!(!store.names.contains_key(&new_name));

            // The new name is free to claim.
            let again = store.save(currency(&new_name)).await.unwrap();
            store.delete_by_id(again.id().unwrap()).await.unwrap();
        }

        assert!(store.is_empty());
        assert!(store.names.is_empty());
    }
}
