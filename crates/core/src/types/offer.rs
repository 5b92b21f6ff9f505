//! Price offers and the ranking step.
//!
//! An [`Offer`] is one normalized quote for a product from a single store.
//! [`rank_offers`] orders a result set cheapest-first and annotates every offer
//! with how much more it costs than the cheapest one.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// A normalized price quote.
///
/// Serializes with the wire names the frontend expects: `price` is the display
/// string and `original` the canonical amount used for sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Store or marketplace name.
    pub platform: String,
    /// Rendered price (e.g. `₹1,999`).
    pub price: String,
    /// Outbound link to the offer.
    pub link: String,
    /// Canonical price in the smallest display unit.
    pub original: u64,
    /// Product image URL (may be empty).
    pub image: String,
    /// Amount above the cheapest offer in the same result set.
    #[serde(default)]
    pub savings: u64,
}

impl Offer {
    /// Build an unranked offer from a parsed price.
    #[must_use]
    pub fn new(
        platform: impl Into<String>,
        price: Price,
        link: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            price: price.to_string(),
            link: link.into(),
            original: price.amount(),
            image: image.into(),
            savings: 0,
        }
    }
}

/// Offers sorted ascending by canonical price with savings filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedOffers {
    offers: Vec<Offer>,
}

impl RankedOffers {
    /// Lowest canonical price, or `None` for an empty result set.
    #[must_use]
    pub fn best_price(&self) -> Option<u64> {
        self.offers.first().map(|offer| offer.original)
    }

    /// Ranked offers, cheapest first.
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Consume the ranking and return the offers.
    #[must_use]
    pub fn into_offers(self) -> Vec<Offer> {
        self.offers
    }
}

/// Sort offers cheapest-first and compute per-offer savings.
///
/// The sort is stable, so offers with equal prices keep their upstream order.
/// Every offer priced at the minimum gets `savings == 0`.
#[must_use]
pub fn rank_offers(mut offers: Vec<Offer>) -> RankedOffers {
    offers.sort_by_key(|offer| offer.original);

    if let Some(best) = offers.first().map(|offer| offer.original) {
        for offer in &mut offers {
            offer.savings = offer.original - best;
        }
    }

    RankedOffers { offers }
}
