//! AwesomeAPI HTTP adapter.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use currency_types::domain::rate::compact_tag;
use currency_types::{ProviderError, RateProvider, RateQuote};

/// Public AwesomeAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://economia.awesomeapi.com.br";

/// Rate provider backed by `GET {base}/json/last/{tag1},{tag2}`.
///
/// The upstream keys its response by the pair with separators removed
/// (`USD-BRL` comes back as `USDBRL`); entries are re-keyed to the tags the
/// caller asked for.
pub struct AwesomeApiProvider {
    base_url: Url,
    http: Client,
}

impl AwesomeApiProvider {
    /// Creates a provider whose requests give up after `timeout`.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| ProviderError::ServiceUnavailable(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::ServiceUnavailable(format!(
                "invalid base URL: {base_url}"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ServiceUnavailable(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    /// Tags go into a single path segment, so `/`, `?` and `#` are escaped.
    fn url_for(&self, tags: &[String]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ProviderError::ServiceUnavailable(format!("invalid base URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("json")
            .push("last")
            .push(&tags.join(","));
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::ServiceUnavailable(err.to_string())
    }
}

#[async_trait]
impl RateProvider for AwesomeApiProvider {
    #[tracing::instrument(skip(self), fields(pairs = tags.len()))]
    async fn fetch_quotes(
        &self,
        tags: &[String],
    ) -> Result<HashMap<String, RateQuote>, ProviderError> {
        if tags.is_empty() {
            return Ok(HashMap::new());
        }

        let resp = self
            .http
            .get(self.url_for(tags)?)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Provider has no data for {:?}", tags);
            return Ok(HashMap::new());
        }
        if !status.is_success() {
            return Err(ProviderError::ServiceUnavailable(format!(
                "upstream returned {}",
                status
            )));
        }

        let body = resp.text().await.map_err(transport_error)?;
        let mut upstream: HashMap<String, RateQuote> =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let quotes = tags
            .iter()
            .filter_map(|tag| {
                upstream
                    .remove(tag)
                    .or_else(|| upstream.remove(&compact_tag(tag)))
                    .map(|quote| (tag.clone(), quote))
            })
            .collect();

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use currency_types::{PairTag, PairTagFormat};
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USD_BRL: &str = r#"{
        "USDBRL": {
            "code": "USD",
            "codein": "BRL",
            "name": "Dólar Americano/Real Brasileiro",
            "high": "5.40",
            "low": "5.30",
            "varBid": "0.01",
            "pctChange": "0.2",
            "bid": "5.36",
            "ask": "5.37",
            "timestamp": "1700000000",
            "create_date": "2023-11-14 19:00:00"
        }
    }"#;

    fn provider(server: &MockServer) -> AwesomeApiProvider {
        AwesomeApiProvider::new(server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_quote_rekeys_to_requested_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/USD-BRL"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USD_BRL))
            .mount(&server)
            .await;

        let tag = PairTag::new("USD", "BRL", PairTagFormat::Dash);
        let quote = provider(&server).get_rate(&tag).await.unwrap().unwrap();

        assert_eq!(quote.bid, Some(dec!(5.36)));
        assert_eq!(quote.low, Some(dec!(5.30)));
        assert_eq!(quote.codein.as_deref(), Some("BRL"));
    }

    #[tokio::test]
    async fn test_unknown_pair_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/USD-XYZ"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"status":404,"code":"CoinNotExists"}"#),
            )
            .mount(&server)
            .await;

        let tag = PairTag::new("USD", "XYZ", PairTagFormat::Dash);
        let quote = provider(&server).get_rate(&tag).await.unwrap();

        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn test_multiple_pairs_partial_answer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/USD-BRL,EUR-BRL"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USD_BRL))
            .mount(&server)
            .await;

        let quotes = provider(&server)
            .fetch_quotes(&["USD-BRL".to_string(), "EUR-BRL".to_string()])
            .await
            .unwrap();

        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("USD-BRL"));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = provider(&server).fetch_quotes(&["USD-BRL".to_string()]).await;

        assert!(matches!(result, Err(ProviderError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(USD_BRL)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = AwesomeApiProvider::new(server.uri(), Duration::from_millis(50)).unwrap();
        let result = provider.fetch_quotes(&["USD-BRL".to_string()]).await;

        assert!(matches!(result, Err(ProviderError::Timeout)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = provider(&server).fetch_quotes(&["USD-BRL".to_string()]).await;

        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider =
            AwesomeApiProvider::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.url_for(&["USD-BRL".to_string()]).unwrap().as_str(),
            "http://localhost:9000/json/last/USD-BRL"
        );
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        let provider =
            AwesomeApiProvider::new("http://localhost:9000/rates", Duration::from_secs(1)).unwrap();
        let tags = ["USD-BRL".to_string(), "EUR-BRL".to_string()];
        assert_eq!(
            provider.url_for(&tags).unwrap().as_str(),
            "http://localhost:9000/rates/json/last/USD-BRL,EUR-BRL"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = AwesomeApiProvider::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ProviderError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_reserved_characters_in_tags_are_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/last/A%2FB%3Fx%23y"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let quotes = provider(&server)
            .fetch_quotes(&["A/B?x#y".to_string()])
            .await
            .unwrap();

        assert!(quotes.is_empty());
        let received = server.received_requests().await.unwrap();
        assert_eq!(received[0].url.path(), "/json/last/A%2FB%3Fx%23y");
        assert_eq!(received[0].url.query(), None);
    }
}
