//! Canonical price representation for shopping offers.
//!
//! Upstream shopping results carry prices as loosely formatted display strings
//! (`"₹1,999"`, `"₹24,990.00"`, sometimes `"N/A"`). A [`Price`] is the canonical
//! form: a whole number in the smallest display unit of its currency, which is
//! what offers are sorted and compared by.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal upstream marker for an offer without a price.
const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The upstream marked the price as unavailable.
    #[error("price not available")]
    NotAvailable,
    /// Nothing left to parse after stripping symbols and separators.
    #[error("price is empty")]
    Empty,
    /// The remaining text is not a number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// ISO 4217 currency codes the upstream locales can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol prefixed to rendered prices.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// A whole-unit price in a single currency.
///
/// ## Examples
///
/// ```
/// use pricetator_core::{CurrencyCode, Price};
///
/// let price = Price::parse("₹1,999.90", CurrencyCode::INR).unwrap();
/// assert_eq!(price.amount(), 1999);
/// assert_eq!(price.to_string(), "₹1,999");
///
/// assert!(Price::parse("N/A", CurrencyCode::INR).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    amount: u64,
    currency: CurrencyCode,
}

impl Price {
    /// Create a price from an already canonical amount.
    #[must_use]
    pub const fn new(amount: u64, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Parse an upstream price string.
    ///
    /// The currency symbol and thousands separators are stripped, the rest is
    /// read as a decimal number (plain or scientific notation) and truncated
    /// toward zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is the literal `"N/A"`
    /// - Is empty once symbols and separators are removed
    /// - Is not a number
    /// - Is negative after truncation
    pub fn parse(raw: &str, currency: CurrencyCode) -> Result<Self, PriceError> {
        let trimmed = raw.trim();
        if trimmed == NOT_AVAILABLE {
            return Err(PriceError::NotAvailable);
        }

        let cleaned: String = trimmed
            .replace(currency.symbol(), "")
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let value = Decimal::from_str(cleaned)
            .or_else(|_| Decimal::from_scientific(cleaned))
            .map_err(|_| PriceError::Invalid(cleaned.to_owned()))?;

        let truncated = value.trunc();
        if truncated.is_zero() {
            return Ok(Self::new(0, currency));
        }
        if truncated.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        let amount = truncated
            .to_u64()
            .ok_or_else(|| PriceError::Invalid(cleaned.to_owned()))?;

        Ok(Self { amount, currency })
    }

    /// Canonical amount in the smallest display unit.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.currency.symbol(),
            group_thousands(self.amount)
        )
    }
}

/// Render an integer with `,` between every group of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
