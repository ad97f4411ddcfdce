//! Currency Application Service
//!
//! Façade over the registry and the conversion engine, sharing one store.
//! Contains NO infrastructure logic - pure business orchestration.

use std::collections::HashMap;
use std::sync::Arc;

use currency_types::{
    AppError, ConvertRequest, ConvertResponse, CurrencyId, CurrencyRequest, CurrencyResponse,
    CurrencyStore, RateProvider, RateQuote, ValidationPolicy,
};

use crate::conversion::{ConversionEngine, ConversionSettings};
use crate::registry::CurrencyRegistry;

/// Deployment knobs for the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceSettings {
    pub policy: ValidationPolicy,
    pub conversion: ConversionSettings,
}

/// Application service for currency operations.
///
/// Generic over `S: CurrencyStore` and `P: RateProvider` - the adapters are
/// injected at compile time. This enables:
/// - Swapping stores or rate feeds without code changes
/// - Testing with in-memory doubles
/// - Compile-time checks for port implementation
pub struct CurrencyService<S: CurrencyStore, P: RateProvider> {
    store: Arc<S>,
    registry: CurrencyRegistry<S>,
    engine: ConversionEngine<S, P>,
}

impl<S: CurrencyStore, P: RateProvider> CurrencyService<S, P> {
    /// Creates a service with default settings (strict validation, local rates).
    pub fn new(store: S, provider: P) -> Self {
        Self::with_settings(store, provider, ServiceSettings::default())
    }

    pub fn with_settings(store: S, provider: P, settings: ServiceSettings) -> Self {
        let store = Arc::new(store);
        Self {
            registry: CurrencyRegistry::new(store.clone(), settings.policy),
            engine: ConversionEngine::new(store.clone(), provider, settings.conversion),
            store,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &CurrencyRegistry<S> {
        &self.registry
    }

    pub fn engine(&self) -> &ConversionEngine<S, P> {
        &self.engine
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Registry Operations
    // ─────────────────────────────────────────────────────────────────────────────

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CurrencyResponse>, AppError> {
        self.registry.list().await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: Option<&CurrencyRequest>) -> Result<CurrencyId, AppError> {
        self.registry.create(payload).await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: i64, payload: Option<&CurrencyRequest>) -> Result<(), AppError> {
        self.registry.update(id, payload).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.registry.delete(id).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion Operations
    // ─────────────────────────────────────────────────────────────────────────────

    #[tracing::instrument(skip(self, payload))]
    pub async fn convert(
        &self,
        payload: Option<&ConvertRequest>,
    ) -> Result<ConvertResponse, AppError> {
        self.engine.convert(payload).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn latest_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, AppError> {
        self.engine.latest_quotes(tags).await
    }
}
