//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{MemoryStore, UserStore};
use crate::serpapi::{SerpApiClient, SerpApiError};
use crate::services::auth::TokenCodec;
use crate::services::search::SearchService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store, the token codec, the search service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: Arc<dyn UserStore>,
    tokens: TokenCodec,
    search: SearchService,
}

impl AppState {
    /// Create application state backed by a fresh [`MemoryStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if a SerpAPI key is configured but the client cannot
    /// be built (bad base URL, TLS backend failure).
    pub fn new(config: AppConfig) -> Result<Self, SerpApiError> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create application state with an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if a SerpAPI key is configured but the client cannot
    /// be built.
    pub fn with_store(config: AppConfig, store: Arc<dyn UserStore>) -> Result<Self, SerpApiError> {
        let provider = if config.serpapi.is_configured() {
            Some(SerpApiClient::new(&config.serpapi)?)
        } else {
            tracing::warn!("SERPAPI_KEY not set, searches will answer NotConfigured");
            None
        };

        let tokens = TokenCodec::new(&config.secret_key);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                tokens,
                search: SearchService::new(provider),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn store(&self) -> &dyn UserStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the bearer token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }

    /// Get a reference to the search service.
    #[must_use]
    pub fn search(&self) -> &SearchService {
        &self.inner.search
    }
}
