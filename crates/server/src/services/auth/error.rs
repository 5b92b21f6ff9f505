//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token could not be signed.
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Token failed validation (signature, algorithm, claims or format).
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Reasons an identity assertion could not be decoded.
///
/// Never shown to clients: a failed decode falls back to a synthetic identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Not three dot-separated segments.
    #[error("identity assertion must have three segments")]
    Malformed,

    /// Payload segment is not base64url.
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not a JSON claims object.
    #[error("payload is not a claims object: {0}")]
    Claims(#[from] serde_json::Error),
}
