//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use currency_types::domain::{CurrencyId, RateQuote};
use currency_types::dto::{ConvertRequest, ConvertResponse, CurrencyRequest, CurrencyResponse};
use utoipa::OpenApi;

use crate::inbound::handlers::ErrorBody;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List stored currencies
#[utoipa::path(
    get,
    path = "/currency",
    tag = "currencies",
    responses(
        (status = 200, description = "Display labels for every stored currency", body = Vec<CurrencyResponse>)
    )
)]
async fn list_currencies() {}

/// Create a currency
#[utoipa::path(
    post,
    path = "/currency",
    tag = "currencies",
    request_body = CurrencyRequest,
    responses(
        (status = 201, description = "Currency created; body is the new id", body = CurrencyId),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "A currency with this name already exists", body = ErrorBody)
    )
)]
async fn create_currency() {}

/// Replace a currency's name, code and exchanges
#[utoipa::path(
    put,
    path = "/currency/{id}",
    tag = "currencies",
    params(("id" = i64, Path, description = "Currency ID")),
    request_body = CurrencyRequest,
    responses(
        (status = 200, description = "Currency updated"),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Currency not found", body = ErrorBody),
        (status = 409, description = "Another currency already has this name", body = ErrorBody)
    )
)]
async fn update_currency() {}

/// Delete a currency
#[utoipa::path(
    delete,
    path = "/currency/{id}",
    tag = "currencies",
    params(("id" = i64, Path, description = "Currency ID")),
    responses(
        (status = 200, description = "Currency deleted"),
        (status = 400, description = "Invalid ID", body = ErrorBody),
        (status = 404, description = "Currency not found", body = ErrorBody)
    )
)]
async fn delete_currency() {}

/// Convert an amount between two currencies
#[utoipa::path(
    post,
    path = "/currency/convert",
    tag = "conversion",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Converted amount", body = ConvertResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Currency, rate or provider data not found", body = ErrorBody),
        (status = 503, description = "Rate provider unavailable", body = ErrorBody)
    )
)]
async fn convert() {}

/// Latest provider quotes for a list of pair tags
#[utoipa::path(
    get,
    path = "/currency/json/last",
    tag = "conversion",
    params(("currencies" = String, Query, description = "Comma-separated pair tags, e.g. USD-BRL,EUR-BRL")),
    responses(
        (status = 200, description = "Quotes keyed by pair tag", body = std::collections::HashMap<String, RateQuote>),
        (status = 400, description = "Empty pair list", body = ErrorBody),
        (status = 503, description = "Rate provider unavailable", body = ErrorBody)
    )
)]
async fn latest_quotes() {}

/// OpenAPI documentation for the Currency API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Catalog API",
        version = "1.0.0",
        description = "Currency registry with local exchange rates and conversion backed by either stored rates or an external rate feed.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        create_currency,
        update_currency,
        delete_currency,
        convert,
        latest_quotes,
    ),
    components(
        schemas(
            CurrencyRequest,
            CurrencyResponse,
            ConvertRequest,
            ConvertResponse,
            CurrencyId,
            RateQuote,
            ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currencies", description = "Currency registry operations"),
        (name = "conversion", description = "Conversion and rate lookups"),
    )
)]
pub struct ApiDoc;
