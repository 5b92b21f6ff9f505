//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as a JSON body
//! with an `error` field; server-side failures are captured to Sentry and
//! their details are never sent to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::search::SearchError;

/// Hint returned with [`AppError::NotConfigured`].
const NOT_CONFIGURED_HINT: &str = "Please set SERPAPI_KEY in .env file";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// No bearer credential was presented.
    #[error("Unauthorized")]
    Unauthorized,

    /// A bearer credential was presented and rejected.
    #[error("Invalid token")]
    InvalidToken,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The price provider has no API key.
    #[error("SerpAPI key not configured")]
    NotConfigured,

    /// Endpoint disabled by configuration.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::NotConfigured => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Io(_) | Self::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
            Self::NotConfigured => {
                json!({ "error": self.to_string(), "message": NOT_CONFIGURED_HINT })
            }
            Self::BadRequest(message) | Self::Forbidden(message) | Self::NotFound(message) => {
                json!({ "error": message })
            }
            Self::Unauthorized | Self::InvalidToken => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::NotFound("User not found".to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => Self::InvalidToken,
            AuthError::Encode(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => Self::BadRequest(err.to_string()),
            SearchError::NotConfigured => Self::NotConfigured,
            SearchError::Repository(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
