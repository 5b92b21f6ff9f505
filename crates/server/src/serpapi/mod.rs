//! SerpAPI Google Shopping client.
//!
//! One GET per search against `{base_url}/search` with `tbm=shop`. The raw
//! records are normalized into [`Offer`]s here; ranking happens in the search
//! service.
//!
//! Upstream failures are not errors for callers: [`SerpApiClient::search`]
//! always returns a [`ProviderOutcome`], and an unavailable provider is
//! reported as such instead of being folded into an empty result.

pub mod conversions;
pub mod types;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use pricetator_core::{CurrencyCode, Offer};

use crate::config::SerpApiConfig;
use conversions::normalize_results;
use types::ShoppingResponse;

/// Search engine parameter for Google Shopping.
const SHOPPING_ENGINE: &str = "shop";

/// Errors that can occur when talking to SerpAPI.
#[derive(Debug, Error)]
pub enum SerpApiError {
    /// No API key is configured.
    #[error("SerpAPI key not configured")]
    MissingApiKey,

    /// The configured base URL is unusable.
    #[error("invalid SerpAPI base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure or timeout. The request URL is stripped so the API
    /// key never reaches logs.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success status or an error message in the body.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SerpApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Result of one provider call.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// At least one usable offer, in upstream order.
    Offers(Vec<Offer>),
    /// The provider answered but nothing survived normalization.
    Empty,
    /// The provider could not be reached or answered with an error.
    Unavailable(SerpApiError),
}

/// SerpAPI client.
#[derive(Clone)]
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: Url,
    country: String,
    currency: CurrencyCode,
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("country", &self.country)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SerpApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured, the base URL does not parse,
    /// or the HTTP client fails to build.
    pub fn new(config: &SerpApiConfig) -> Result<Self, SerpApiError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(SerpApiError::MissingApiKey)?;

        let endpoint = Url::parse(&format!("{}/search", config.base_url.trim_end_matches('/')))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            country: config.country.clone(),
            currency: currency_for_country(&config.country),
        })
    }

    /// Search Google Shopping for `query` and normalize the results.
    pub async fn search(&self, query: &str) -> ProviderOutcome {
        match self.fetch(query).await {
            Ok(response) => {
                let results = response.shopping_results.unwrap_or_default();
                let offers = normalize_results(&results, self.currency);
                tracing::debug!(
                    raw = results.len(),
                    kept = offers.len(),
                    "Normalized shopping results"
                );
                if offers.is_empty() {
                    ProviderOutcome::Empty
                } else {
                    ProviderOutcome::Offers(offers)
                }
            }
            Err(e) => ProviderOutcome::Unavailable(e),
        }
    }

    async fn fetch(&self, query: &str) -> Result<ShoppingResponse, SerpApiError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("tbm", SHOPPING_ENGINE)
            .append_pair("api_key", self.api_key.expose_secret())
            .append_pair("gl", &self.country);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ShoppingResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ShoppingResponse = response
            .json()
            .await
            .map_err(|e| SerpApiError::Parse(e.without_url().to_string()))?;

        // SerpAPI reports some failures (bad key, quota) with a 200 and an
        // `error` field instead of results.
        if parsed.shopping_results.is_none()
            && let Some(message) = parsed.error
        {
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parsed)
    }
}

/// Currency whose symbol prices are quoted in for a SerpAPI `gl` country.
#[must_use]
pub fn currency_for_country(country: &str) -> CurrencyCode {
    match country.to_ascii_lowercase().as_str() {
        "us" => CurrencyCode::USD,
        "gb" | "uk" => CurrencyCode::GBP,
        "de" | "fr" | "es" | "it" | "nl" | "ie" | "at" | "be" | "fi" | "pt" => CurrencyCode::EUR,
        _ => CurrencyCode::INR,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(base_url: &str) -> SerpApiConfig {
        SerpApiConfig {
            api_key: Some(SecretString::from("test-serpapi-key")),
            base_url: base_url.to_string(),
            country: "in".to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_new_requires_key() {
        let mut config = config("http://localhost:1");
        config.api_key = None;
        assert!(matches!(
            SerpApiClient::new(&config),
            Err(SerpApiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = SerpApiClient::new(&config("http://localhost:1/")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("test-serpapi-key"));
        assert!(debug.contains("http://localhost:1/search"));
    }

    #[test]
    fn test_currency_for_country() {
        assert_eq!(currency_for_country("in"), CurrencyCode::INR);
        assert_eq!(currency_for_country("US"), CurrencyCode::USD);
        assert_eq!(currency_for_country("gb"), CurrencyCode::GBP);
        assert_eq!(currency_for_country("de"), CurrencyCode::EUR);
    }

    #[tokio::test]
    async fn test_search_sends_shopping_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "pixel 8"))
            .and(query_param("tbm", "shop"))
            .and(query_param("api_key", "test-serpapi-key"))
            .and(query_param("gl", "in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shopping_results": [
                    { "price": "₹52,999", "source": "Flipkart" },
                    { "price": "N/A", "source": "Nowhere" },
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SerpApiClient::new(&config(&server.uri())).unwrap();
        let ProviderOutcome::Offers(offers) = client.search("pixel 8").await else {
            panic!("expected offers");
        };
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].platform, "Flipkart");
        assert_eq!(offers[0].original, 52_999);
    }

    #[tokio::test]
    async fn test_search_without_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(&config(&server.uri())).unwrap();
        assert!(matches!(client.search("x").await, ProviderOutcome::Empty));
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key." })),
            )
            .mount(&server)
            .await;

        let client = SerpApiClient::new(&config(&server.uri())).unwrap();
        match client.search("x").await {
            ProviderOutcome::Unavailable(SerpApiError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key.");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_field_with_ok_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "error": "Your account has run out of searches." })),
            )
            .mount(&server)
            .await;

        let client = SerpApiClient::new(&config(&server.uri())).unwrap();
        assert!(matches!(
            client.search("x").await,
            ProviderOutcome::Unavailable(SerpApiError::Api { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(&config(&server.uri())).unwrap();
        assert!(matches!(
            client.search("x").await,
            ProviderOutcome::Unavailable(SerpApiError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "shopping_results": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut config = config(&server.uri());
        config.timeout = Duration::from_millis(200);
        let client = SerpApiClient::new(&config).unwrap();
        assert!(matches!(
            client.search("x").await,
            ProviderOutcome::Unavailable(SerpApiError::Http(_))
        ));
    }
}
