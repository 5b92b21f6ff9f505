//! Conversions from SerpAPI shopping results to [`Offer`]s.
//!
//! Unusable records are skipped silently; an empty output is a normal result.

use serde::Deserialize;
use serde_json::Value;

use pricetator_core::{CurrencyCode, Offer, Price};

use super::types::ShoppingResult;

/// Number of upstream records considered per search, taken before filtering.
pub const MAX_RESULTS: usize = 6;

const DEFAULT_PLATFORM: &str = "Online Store";
const DEFAULT_LINK: &str = "#";

/// Normalize the first [`MAX_RESULTS`] records, keeping upstream order.
#[must_use]
pub fn normalize_results(results: &[Value], currency: CurrencyCode) -> Vec<Offer> {
    results
        .iter()
        .take(MAX_RESULTS)
        .filter_map(|raw| normalize_result(raw, currency))
        .collect()
}

/// Normalize a single record, or `None` if it has no usable price.
#[must_use]
pub fn normalize_result(raw: &Value, currency: CurrencyCode) -> Option<Offer> {
    let result = ShoppingResult::deserialize_lenient(raw)?;
    let raw_price = result.price?;

    let price = match Price::parse(&raw_price.as_text(), currency) {
        Ok(price) => price,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping shopping result");
            return None;
        }
    };

    Some(Offer::new(
        result.source.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        price,
        result.link.unwrap_or_else(|| DEFAULT_LINK.to_string()),
        result.image.unwrap_or_default(),
    ))
}

impl ShoppingResult {
    fn deserialize_lenient(raw: &Value) -> Option<Self> {
        Self::deserialize(raw)
            .map_err(|e| tracing::debug!(error = %e, "Malformed shopping result"))
            .ok()
    }
}
