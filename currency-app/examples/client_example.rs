//! Client example walking through the currency API against a local server.
//!
//! Run with: cargo run -p currency-app --example client_example

use currency_client::CurrencyClient;
use currency_hex::{ConversionSettings, CurrencyService, ServiceSettings, inbound::HttpServer};
use currency_repo::{DEFAULT_ACQUIRE_TIMEOUT, build_repo};
use currency_types::{ConvertRequest, CurrencyRequest, RateSource};
use rate_feed::StaticRateProvider;
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Bind an ephemeral port and keep the listener for the server
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr} (in-memory store)...");

    let repo = build_repo("memory://", DEFAULT_ACQUIRE_TIMEOUT).await?;
    let service = CurrencyService::new(repo, StaticRateProvider::development());
    let router = HttpServer::new(service).router();

    tokio::spawn(async move {
        if let Err(e) = axum_serve(listener, router).await {
            eprintln!("server stopped: {e}");
        }
    });

    let client = CurrencyClient::new(format!("http://{addr}"));

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: registry and local conversion
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let usd = client
        .create(
            &CurrencyRequest::new("USD", "US")
                .with_rate("EUR", dec!(0.92))
                .with_rate("BRL", dec!(5.36)),
        )
        .await?;
    println!("✅ Created USD (id={usd})");

    let eur = client
        .create(&CurrencyRequest::new("EUR", "EU").with_rate("USD", dec!(1.087)))
        .await?;
    println!("✅ Created EUR (id={eur})");

    let duplicate = client.create(&CurrencyRequest::new("USD", "US")).await;
    println!("✅ Duplicate rejected: {}", duplicate.is_err());

    let converted = client
        .convert(&ConvertRequest::new("USD", "BRL", dec!(10)))
        .await?;
    println!("✅ 10 USD -> {} BRL", converted.amount);

    let missing = client
        .convert(&ConvertRequest::new("USD", "GBP", dec!(10)))
        .await;
    if let Err(e) = missing {
        println!("✅ No USD->GBP rate: {e}");
    }

    client
        .update(eur, &CurrencyRequest::new("Euro", "EU"))
        .await?;
    println!("✅ Renamed EUR to Euro");

    let quotes = client.latest_quotes(&["USD-BRL", "USD-EUR"]).await?;
    println!("\n📈 Latest quotes:");
    for (tag, quote) in &quotes {
        println!("   - {tag}: bid {:?}", quote.bid);
    }

    println!("\n📋 All currencies:");
    for currency in client.list().await? {
        println!("   - {}", currency.label);
    }

    client.delete(eur).await?;
    println!("\n✅ Deleted Euro; {} left", client.list().await?.len());

    // Same table, provider-backed rates
    let provider_settings = ServiceSettings {
        conversion: ConversionSettings {
            source: RateSource::Provider,
            ..ConversionSettings::default()
        },
        ..ServiceSettings::default()
    };
    let repo = build_repo("memory://", DEFAULT_ACQUIRE_TIMEOUT).await?;
    let service = CurrencyService::with_settings(
        repo,
        StaticRateProvider::development(),
        provider_settings,
    );
    let converted = service
        .convert(Some(&ConvertRequest::new("USD", "INR", dec!(2))))
        .await?;
    println!("✅ Provider-backed: 2 USD -> {} INR", converted.amount);

    println!("\n🎉 Example completed successfully!");

    Ok(())
}

async fn axum_serve(listener: TcpListener, router: axum::Router) -> std::io::Result<()> {
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await
}
