//! Product price search.
//!
//! Each search runs in a fixed order: provider configured check, provider
//! call, normalization, history recording, ranking. History is recorded before
//! ranking so the stored `results_count` is the number of offers that
//! survived normalization, and it is recorded for empty results too. A
//! provider that is not configured fails before anything is recorded.

use serde::Serialize;
use thiserror::Error;

use pricetator_core::{Offer, UserId, rank_offers};

use crate::db::{RepositoryError, UserStore};
use crate::serpapi::{ProviderOutcome, SerpApiClient};

/// Message returned alongside an empty result set.
pub const NO_RESULTS_MESSAGE: &str = "No prices found for this product";

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Product name was empty after trimming.
    #[error("Product name is required")]
    EmptyQuery,

    /// No provider API key is configured.
    #[error("SerpAPI key not configured")]
    NotConfigured,

    /// Recording the search failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Search result as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    /// At least one offer, ranked cheapest first.
    Found {
        product: String,
        best_price: u64,
        total_results: usize,
        results: Vec<Offer>,
    },
    /// No usable offer.
    Empty {
        product: String,
        message: &'static str,
        results: Vec<Offer>,
    },
}

impl SearchResponse {
    fn empty(product: String) -> Self {
        Self::Empty {
            product,
            message: NO_RESULTS_MESSAGE,
            results: Vec::new(),
        }
    }
}

/// Runs searches against the configured provider.
#[derive(Debug, Clone, Default)]
pub struct SearchService {
    provider: Option<SerpApiClient>,
}

impl SearchService {
    #[must_use]
    pub const fn new(provider: Option<SerpApiClient>) -> Self {
        Self { provider }
    }

    /// Whether a provider is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Search for `product` on behalf of `user_id` and record it in their
    /// history.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyQuery` for a blank product name,
    /// `SearchError::NotConfigured` if no provider is configured (nothing is
    /// recorded), or `SearchError::Repository` if recording fails.
    pub async fn search(
        &self,
        store: &dyn UserStore,
        user_id: &UserId,
        product: &str,
    ) -> Result<SearchResponse, SearchError> {
        let product = product.trim();
        if product.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let provider = self.provider.as_ref().ok_or(SearchError::NotConfigured)?;

        let offers = match provider.search(product).await {
            ProviderOutcome::Offers(offers) => offers,
            ProviderOutcome::Empty => Vec::new(),
            ProviderOutcome::Unavailable(e) => {
                tracing::warn!(error = %e, product, "Price provider unavailable");
                Vec::new()
            }
        };

        store
            .append_history(user_id, product, offers.len())
            .await?;

        let ranked = rank_offers(offers);
        let Some(best_price) = ranked.best_price() else {
            tracing::info!(user_id = %user_id, product, "No prices found");
            return Ok(SearchResponse::empty(product.to_owned()));
        };

        tracing::info!(
            user_id = %user_id,
            product,
            results = ranked.len(),
            best_price,
            "Search completed"
        );

        Ok(SearchResponse::Found {
            product: product.to_owned(),
            best_price,
            total_results: ranked.len(),
            results: ranked.into_offers(),
        })
    }
}
