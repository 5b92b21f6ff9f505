//! Raw SerpAPI response shapes.
//!
//! Only the fields the normalizer reads are modelled. Individual results are
//! kept as loose JSON so one malformed record cannot fail the whole response.

use serde::Deserialize;
use serde_json::Value;

/// Top-level Google Shopping response.
#[derive(Debug, Default, Deserialize)]
pub struct ShoppingResponse {
    /// Result records in upstream order. `null` and absent both mean none.
    #[serde(default)]
    pub shopping_results: Option<Vec<Value>>,
    /// Error message SerpAPI reports instead of results.
    #[serde(default)]
    pub error: Option<String>,
}

/// One shopping result record.
#[derive(Debug, Deserialize)]
pub struct ShoppingResult {
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Price as sent upstream: usually display text, occasionally a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl RawPrice {
    /// Text form handed to the price parser.
    #[must_use]
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Text(text) => std::borrow::Cow::Borrowed(text),
            Self::Number(number) => std::borrow::Cow::Owned(number.to_string()),
        }
    }
}
