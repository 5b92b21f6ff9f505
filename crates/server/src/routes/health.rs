//! Welcome and health endpoints.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// API version reported by the welcome endpoint.
pub const API_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Whether a SerpAPI key is configured.
    pub provider_configured: bool,
}

/// `GET /`
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Pricetator! 💰",
        version: API_VERSION,
    })
}

/// `GET /api/health`
///
/// Liveness only. Reports provider configuration without contacting it.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Pricetator backend is running!",
        provider_configured: state.search().is_configured(),
    })
}
