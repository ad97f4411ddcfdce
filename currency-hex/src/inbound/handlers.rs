//! HTTP request handlers.
//!
//! A body that fails to parse is handed to the service as an absent payload,
//! so the validator reports it like any other malformed request.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use currency_types::{
    AppError, ConvertRequest, CurrencyRequest, CurrencyStore, DomainError, RateProvider,
};

use crate::CurrencyService;

/// Application state shared across handlers.
pub struct AppState<S: CurrencyStore, P: RateProvider> {
    pub service: CurrencyService<S, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err.into())
    }
}

/// Error payload returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    #[schema(example = "Coin not found: USD")]
    pub error: String,
    /// Stable failure kind
    #[schema(example = "COIN_NOT_FOUND")]
    pub kind: String,
    /// HTTP status code
    #[schema(example = 404)]
    pub code: u16,
}

/// HTTP status for each failure kind.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_)
        | AppError::CoinNotFound(_)
        | AppError::ExchangeNotFound { .. }
        | AppError::ConversionDataNotFound { .. } => StatusCode::NOT_FOUND,
        AppError::AlreadyExists(_) => StatusCode::CONFLICT,
        AppError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::InvalidCurrencyId.into())
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List all currencies.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let currencies = state.service.list().await?;
    Ok(Json(currencies))
}

/// Create a currency.
#[tracing::instrument(skip(state, payload))]
pub async fn create_currency<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    payload: Result<Json<CurrencyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = payload.ok().map(|Json(req)| req);
    let id = state.service.create(req.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

/// Replace a currency.
#[tracing::instrument(skip(state, payload), fields(currency_id = %id))]
pub async fn update_currency<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
    payload: Result<Json<CurrencyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let req = payload.ok().map(|Json(req)| req);
    state.service.update(id, req.as_ref()).await?;
    Ok(StatusCode::OK)
}

/// Delete a currency.
#[tracing::instrument(skip(state), fields(currency_id = %id))]
pub async fn delete_currency<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Convert with a JSON body.
#[tracing::instrument(skip(state, payload))]
pub async fn convert<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = payload.ok().map(|Json(req)| req);
    let response = state.service.convert(req.as_ref()).await?;
    Ok(Json(response))
}

/// Convert with `?from=&to=&amount=` query parameters.
#[tracing::instrument(skip(state, params))]
pub async fn convert_query<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    params: Result<Query<ConvertRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = params.ok().map(|Query(req)| req);
    let response = state.service.convert(req.as_ref()).await?;
    Ok(Json(response))
}

/// Query string for the latest-quotes lookup.
#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    /// Comma-separated pair tags
    #[serde(default, alias = "currenciesAPI")]
    pub currencies: Option<String>,
}

/// Latest provider quotes for a list of pair tags.
#[tracing::instrument(skip(state))]
pub async fn latest_quotes<S: CurrencyStore, P: RateProvider>(
    State(state): State<Arc<AppState<S, P>>>,
    Query(query): Query<QuotesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tags: Vec<String> = query
        .currencies
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let quotes = state.service.latest_quotes(&tags).await?;
    Ok(Json(quotes))
}
