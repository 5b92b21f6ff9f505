//! Core types for Pricetator.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod offer;
pub mod price;

pub use id::*;
pub use offer::{Offer, RankedOffers, rank_offers};
pub use price::{CurrencyCode, Price, PriceError};
