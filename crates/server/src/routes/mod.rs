//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                  - Welcome message and version
//! GET    /api/health                        - Health check
//!
//! # Auth
//! POST   /api/auth/google                   - Unverified Google sign-in (flag-gated)
//! POST   /api/auth/logout                   - Logout
//!
//! # User (requires bearer token)
//! GET    /api/user/profile                  - Profile with search count
//! PUT    /api/user/profile                  - Update display name
//! GET    /api/user/search-history           - History, newest first
//! DELETE /api/user/search-history/clear     - Clear history
//! DELETE /api/user/search-history/{id}      - Delete one entry
//!
//! # Search
//! POST   /api/search                        - Compare prices (requires bearer token)
//! GET    /api/trending                      - Trending products
//! POST   /api/upload-image                  - Upload a product image (requires bearer token)
//!
//! # Static
//! GET    /static/uploads/*                  - Uploaded images
//! ```

pub mod auth;
pub mod health;
pub mod search;
pub mod trending;
pub mod upload;
pub mod user;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest, Request},
    http::{HeaderName, HeaderValue, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::middleware::{REQUEST_ID_HEADER, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Maximum accepted request body (uploads included).
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// JSON body extractor whose rejection renders as an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/google", post(auth::google_sign_in))
        .route("/logout", post(auth::logout))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route("/search-history", get(user::list_history))
        .route("/search-history/clear", delete(user::clear_history))
        .route("/search-history/{id}", delete(user::delete_history_entry))
}

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .route("/search", post(search::search))
        .route("/trending", get(trending::trending))
        .route("/upload-image", post(upload::upload_image))
}

/// Assemble the full application router with its middleware stack.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().allowed_origins);
    let uploads = ServeDir::new(&state.config().upload_dir);

    Router::new()
        .route("/", get(health::welcome))
        .nest("/api", api_routes())
        .nest_service(upload::UPLOADS_URL_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(cors)
        .with_state(state)
}

/// Request span with empty slots filled in by the request ID middleware and
/// the auth extractor.
fn make_request_span(request: &Request) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        user_id = tracing::field::Empty,
    )
}

/// CORS for the configured frontend origins. Origins that fail to parse as
/// header values are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| {
                    tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}
