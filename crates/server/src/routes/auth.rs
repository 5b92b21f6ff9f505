//! Sign-in and sign-out.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiJson;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::UserProfile;
use crate::services::auth::bootstrap_identity;
use crate::state::AppState;

/// `POST /api/auth/google` body.
#[derive(Deserialize)]
pub struct GoogleAuthRequest {
    /// Google identity assertion (`header.payload.signature`).
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `POST /api/auth/google`
///
/// Trusts the assertion's claims without verifying its signature, so it only
/// answers when unverified sign-in is enabled in configuration.
#[instrument(skip_all)]
pub async fn google_sign_in(
    State(state): State<AppState>,
    request: Result<ApiJson<GoogleAuthRequest>>,
) -> Result<Json<AuthResponse>> {
    if !state.config().allow_unverified_identity {
        return Err(AppError::Forbidden(
            "Unverified sign-in is disabled".to_string(),
        ));
    }
    let ApiJson(request) = request?;

    let assertion = request
        .token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Token is required".to_string()))?;

    let bootstrap = bootstrap_identity(&assertion, Utc::now());
    let user = state.store().upsert_user(bootstrap.user).await?;
    let total_searches = state.store().search_count(&user.user_id).await?;
    let token = state.tokens().issue(&user.user_id)?;

    set_sentry_user(&user.user_id, Some(&user.email));
    tracing::info!(
        user_id = %user.user_id,
        synthetic = bootstrap.synthetic,
        "User signed in"
    );

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: UserProfile::new(user, total_searches),
    }))
}

/// `POST /api/auth/logout`
///
/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout() -> Json<LogoutResponse> {
    clear_sentry_user();
    Json(LogoutResponse {
        success: true,
        message: "Logged out successfully",
    })
}
