//! HTTP Server configuration and startup.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use currency_types::{CurrencyStore, RateProvider};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::CurrencyService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Currency API.
pub struct HttpServer<S: CurrencyStore, P: RateProvider> {
    state: Arc<AppState<S, P>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<S: CurrencyStore, P: RateProvider> HttpServer<S, P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: CurrencyService<S, P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: CurrencyService<S, P>, requests_per_minute: u32) -> Self {
        Self::with_rate_limiter(
            service,
            RateLimiterState::new(requests_per_minute, Duration::from_secs(60)),
        )
    }

    /// Creates a new HTTP server around a configured limiter.
    pub fn with_rate_limiter(service: CurrencyService<S, P>, rate_limiter: RateLimiterState) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let api = Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/currency",
                get(handlers::list_currencies::<S, P>).post(handlers::create_currency::<S, P>),
            )
            .route(
                "/currency/convert",
                get(handlers::convert_query::<S, P>).post(handlers::convert::<S, P>),
            )
            .route("/currency/json/last", get(handlers::latest_quotes::<S, P>))
            .route(
                "/currency/{id}",
                put(handlers::update_currency::<S, P>).delete(handlers::delete_currency::<S, P>),
            )
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .with_state(self.state.clone());

        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .merge(api)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        // Peer addresses key the rate limiter
        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
