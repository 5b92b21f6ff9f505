//! Profile and search history.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pricetator_core::HistoryEntryId;

use super::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{SearchHistoryEntry, User, UserProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// `PUT /api/user/profile` body. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<SearchHistoryEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Load the profile for an authenticated user.
///
/// A valid token can outlive its user: the store is process-local and tokens
/// never expire.
async fn load_profile(state: &AppState, user: User) -> Result<UserProfile> {
    let total_searches = state.store().search_count(&user.user_id).await?;
    Ok(UserProfile::new(user, total_searches))
}

async fn require_user(state: &AppState, auth: &RequireAuth) -> Result<User> {
    state
        .store()
        .get_user(&auth.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// `GET /api/user/profile`
#[instrument(skip_all, fields(user_id = %auth.0))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<ProfileResponse>> {
    let user = require_user(&state, &auth).await?;
    Ok(Json(ProfileResponse {
        user: load_profile(&state, user).await?,
    }))
}

/// `PUT /api/user/profile`
#[instrument(skip_all, fields(user_id = %auth.0))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    let mut user = require_user(&state, &auth).await?;

    if let Some(name) = request.name {
        user = state.store().update_name(&auth.0, &name).await?;
        tracing::info!("Profile name updated");
    }

    Ok(Json(UpdateProfileResponse {
        success: true,
        user: load_profile(&state, user).await?,
    }))
}

/// `GET /api/user/search-history`
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn list_history(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<HistoryResponse>> {
    let history = state.store().list_history(&user_id).await?;
    Ok(Json(HistoryResponse {
        total: history.len(),
        history,
    }))
}

/// `DELETE /api/user/search-history/{id}`
///
/// Succeeds whether or not the entry existed.
#[instrument(skip_all, fields(user_id = %user_id, entry_id = %entry_id))]
pub async fn delete_history_entry(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    Path(entry_id): Path<HistoryEntryId>,
) -> Result<Json<SuccessResponse>> {
    let removed = state
        .store()
        .delete_history_entry(&user_id, &entry_id)
        .await?;
    tracing::debug!(removed, "History entry delete");

    Ok(Json(SuccessResponse {
        success: true,
        message: None,
    }))
}

/// `DELETE /api/user/search-history/clear`
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn clear_history(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
) -> Result<Json<SuccessResponse>> {
    state.store().clear_history(&user_id).await?;
    tracing::info!("Search history cleared");

    Ok(Json(SuccessResponse {
        success: true,
        message: Some("Search history cleared"),
    }))
}
