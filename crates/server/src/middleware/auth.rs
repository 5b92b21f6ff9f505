//! Bearer token authentication extractor.
//!
//! Handlers that need a signed-in user take [`RequireAuth`] as an argument.
//! The rejection body only tells the client whether a credential was missing
//! or rejected; the cause of a rejection is logged at debug level.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use pricetator_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user_id): RequireAuth) -> String {
///     format!("Hello, {user_id}!")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub UserId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| {
                tracing::debug!("Malformed Authorization header");
                AppError::InvalidToken
            })?;

        let user_id = state.tokens().validate(token)?;
        tracing::Span::current().record("user_id", user_id.as_str());

        Ok(Self(user_id))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
