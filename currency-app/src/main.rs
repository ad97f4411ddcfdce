//! # Currency Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the store adapter and the rate feed
//! - Create the currency service
//! - Start the HTTP server

mod config;
mod feed;

use std::time::Duration;

use opentelemetry::global;
use opentelemetry_sdk::{
    metrics::SdkMeterProvider, propagation::TraceContextPropagator, trace as sdktrace,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use currency_hex::{
    CurrencyService,
    inbound::{HttpServer, rate_limit::RateLimiterState},
};
use currency_repo::build_repo;

use crate::feed::RateFeed;

/// Exporters installed when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
struct Telemetry {
    tracer: sdktrace::Tracer,
    tracer_provider: sdktrace::SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    fn shutdown(self) {
        let _ = self.tracer_provider.shutdown();
        let _ = self.meter_provider.shutdown();
    }
}

fn init_telemetry() -> anyhow::Result<Telemetry> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let tracer_provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .build();

    global::set_tracer_provider(tracer_provider.clone());

    // HTTP metrics layer reads the global MeterProvider
    let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .build()?;

    let meter_provider = SdkMeterProvider::builder()
        .with_periodic_exporter(metric_exporter)
        .build();

    global::set_meter_provider(meter_provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok(Telemetry {
        tracer: tracer_provider.tracer("currency-service"),
        tracer_provider,
        meter_provider,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry only when a collector is configured
    let telemetry = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(_) => Some(init_telemetry()?),
        Err(_) => None,
    };
    let otel_layer = telemetry
        .as_ref()
        .map(|t| tracing_opentelemetry::layer().with_tracer(t.tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,currency_app=debug,currency_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting currency server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    // Build store (handles connection and migration)
    let repo = build_repo(&config.database_url, config.db_acquire_timeout).await?;
    let feed = RateFeed::from_config(&config)?;

    tracing::info!(
        store = repo.backend(),
        feed = feed.describe(),
        source = ?config.settings.conversion.source,
        quote_field = %config.settings.conversion.quote_field,
        "Service configured"
    );

    // Create the currency service
    let service = CurrencyService::with_settings(repo, feed, config.settings);

    // Create and run the HTTP server
    let limiter = RateLimiterState::new(config.rate_limit_per_minute, Duration::from_secs(60))
        .trust_forwarded_for(config.trust_forwarded_for);
    let server = HttpServer::with_rate_limiter(service, limiter);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces and metrics are flushed before exit
    if let Some(telemetry) = telemetry {
        telemetry.shutdown();
    }
    Ok(())
}
