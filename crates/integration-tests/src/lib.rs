//! Integration tests for Pricetator.
//!
//! Tests assemble the real router in-process and drive it with
//! `tower::ServiceExt::oneshot`; SerpAPI is replaced by a `wiremock` server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pricetator-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Sign-in, logout, bearer token handling
//! - `search` - Search flow against a mocked provider
//! - `history` - Profile and search history endpoints
//! - `misc` - Health, trending, uploads, response headers

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use pricetator_server::config::{AppConfig, SerpApiConfig};
use pricetator_server::{AppState, build_router};

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "kJ8#vQ2!pL9@xW4$mN7%rT1^zB5&cY3*";

/// Configuration for a test app.
#[derive(Debug, Default, Clone)]
pub struct TestOptions {
    /// SerpAPI base URL; `None` leaves the provider unconfigured.
    pub serpapi_base_url: Option<String>,
    /// Serve the unverified sign-in endpoint.
    pub allow_unverified_identity: bool,
}

impl TestOptions {
    /// Unverified sign-in enabled, provider at `base_url`.
    #[must_use]
    pub fn with_provider(base_url: impl Into<String>) -> Self {
        Self {
            serpapi_base_url: Some(base_url.into()),
            allow_unverified_identity: true,
        }
    }

    /// Unverified sign-in enabled, no provider.
    #[must_use]
    pub const fn without_provider() -> Self {
        Self {
            serpapi_base_url: None,
            allow_unverified_identity: true,
        }
    }
}

/// An assembled router plus the temporary upload directory it writes to.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    upload_dir: TempDir,
}

/// Build the configuration a test app runs with.
#[must_use]
pub fn test_config(options: &TestOptions, upload_dir: PathBuf) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        secret_key: SecretString::from(TEST_SECRET),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        upload_dir,
        allow_unverified_identity: options.allow_unverified_identity,
        serpapi: SerpApiConfig {
            api_key: options
                .serpapi_base_url
                .as_ref()
                .map(|_| SecretString::from("test-serpapi-key")),
            base_url: options
                .serpapi_base_url
                .clone()
                .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
            country: "in".to_string(),
            timeout: Duration::from_secs(2),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

impl TestApp {
    #[must_use]
    pub fn new(options: &TestOptions) -> Self {
        let upload_dir = TempDir::new().unwrap();
        let config = test_config(options, upload_dir.path().join("uploads"));
        let state = AppState::new(config).unwrap();
        Self {
            router: build_router(state.clone()),
            state,
            upload_dir,
        }
    }

    /// Directory uploaded files land in.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.path().join("uploads")
    }

    /// Send one request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and decode the JSON body.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Sign in through `/api/auth/google` and return the bearer token and user.
    pub async fn sign_in(&self, claims: &Value) -> (String, Value) {
        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/api/auth/google",
                None,
                &json!({ "token": identity_assertion(claims) }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"].clone(),
        )
    }
}

/// Decode a response body as JSON (`{}` if the body is not JSON).
pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

/// Request without a body.
#[must_use]
pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Request with a JSON body.
#[must_use]
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Unsigned Google-style identity assertion carrying `claims`.
#[must_use]
pub fn identity_assertion(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.unsigned")
}
