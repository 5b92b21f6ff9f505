//! Trending products.

use axum::Json;
use serde::Serialize;

/// Fixed trending list, most searched first.
const TRENDING: &[(&str, u32)] = &[
    ("iPhone 15", 1250),
    ("Samsung Galaxy S24", 980),
    ("MacBook Air", 650),
    ("OnePlus Nord CE5", 540),
    ("iPad Pro", 420),
    ("AirPods Pro", 380),
];

#[derive(Debug, Serialize)]
pub struct TrendingProduct {
    pub name: &'static str,
    pub searches: u32,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending: Vec<TrendingProduct>,
}

/// `GET /api/trending`
pub async fn trending() -> Json<TrendingResponse> {
    Json(TrendingResponse {
        trending: TRENDING
            .iter()
            .map(|&(name, searches)| TrendingProduct { name, searches })
            .collect(),
    })
}
