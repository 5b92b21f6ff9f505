//! Product search endpoint.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::search::SearchResponse;
use crate::state::AppState;

/// `POST /api/search` body. A missing name is treated as empty.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub product_name: Option<String>,
}

/// `POST /api/search`
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn search(
    State(state): State<AppState>,
    RequireAuth(user_id): RequireAuth,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let product = request.product_name.unwrap_or_default();
    let response = state
        .search()
        .search(state.store(), &user_id, &product)
        .await?;
    Ok(Json(response))
}
