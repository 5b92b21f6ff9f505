//! Pricetator server library.
//!
//! The API backend as a library, so the router can be assembled and exercised
//! in-process by the integration tests.
//!
//! # Architecture
//!
//! - Axum JSON API; handlers reach storage only through [`db::UserStore`]
//! - Stateless HS256 bearer tokens ([`services::auth::TokenCodec`])
//! - SerpAPI Google Shopping as the price provider ([`serpapi`])
//! - Price parsing and ranking in `pricetator-core`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod serpapi;
pub mod services;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
