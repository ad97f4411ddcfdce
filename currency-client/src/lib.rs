//! # Currency Client SDK
//!
//! A typed Rust client for the Currency API.

use std::collections::HashMap;

use currency_types::{
    ConvertRequest, ConvertResponse, CurrencyId, CurrencyRequest, CurrencyResponse, RateQuote,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        /// Failure kind reported by the server, when the body carried one
        kind: Option<String>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Currency API client.
pub struct CurrencyClient {
    base_url: String,
    http: Client,
}

impl CurrencyClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Lists every currency as `"<id> - <name>"` labels.
    pub async fn list(&self) -> Result<Vec<CurrencyResponse>, ClientError> {
        self.fetch(self.http.get(self.url("/currency"))).await
    }

    /// Creates a currency and returns its id.
    pub async fn create(&self, req: &CurrencyRequest) -> Result<CurrencyId, ClientError> {
        self.fetch(self.http.post(self.url("/currency")).json(req))
            .await
    }

    /// Replaces name, code and exchanges of a currency.
    pub async fn update(&self, id: CurrencyId, req: &CurrencyRequest) -> Result<(), ClientError> {
        self.execute(self.http.put(self.url(&format!("/currency/{}", id))).json(req))
            .await
    }

    /// Deletes a currency.
    pub async fn delete(&self, id: CurrencyId) -> Result<(), ClientError> {
        self.execute(self.http.delete(self.url(&format!("/currency/{}", id))))
            .await
    }

    /// Converts an amount using the server's configured rate source.
    pub async fn convert(&self, req: &ConvertRequest) -> Result<ConvertResponse, ClientError> {
        self.fetch(self.http.post(self.url("/currency/convert")).json(req))
            .await
    }

    /// Latest provider quotes, keyed by the requested pair tags.
    pub async fn latest_quotes(
        &self,
        tags: &[&str],
    ) -> Result<HashMap<String, RateQuote>, ClientError> {
        let req = self
            .http
            .get(self.url("/currency/json/last"))
            .query(&[("currencies", tags.join(","))]);
        self.fetch(req).await
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn execute(&self, req: RequestBuilder) -> Result<(), ClientError> {
        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        if resp.status().is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    async fn api_error(resp: reqwest::Response) -> ClientError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name).and_then(|e| e.as_str()).map(String::from))
        };

        ClientError::Api {
            status: status.as_u16(),
            kind: field("kind"),
            message: field("error").unwrap_or(body),
        }
    }
}
