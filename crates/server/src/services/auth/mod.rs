//! Authentication services.
//!
//! Two independent pieces:
//!
//! - [`TokenCodec`] issues and validates the server's own bearer tokens
//!   (HS256, claims `{user_id}`, no expiry).
//! - [`identity`] turns an externally issued Google identity assertion into a
//!   [`NewUser`](crate::models::NewUser) **without verifying its signature**.
//!   It is only reachable when `PRICETATOR_ALLOW_UNVERIFIED_IDENTITY` is set.

mod error;
pub mod identity;

pub use error::{AuthError, IdentityError};
pub use identity::{Bootstrap, bootstrap_identity};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use pricetator_core::UserId;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
}

/// Issues and validates HS256 bearer tokens with a process-wide secret.
///
/// Tokens carry no expiry and stay valid until the secret changes.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are time-unbounded; only the signature and claims are checked.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Sign a token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Encode` if signing fails.
    pub fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        let claims = TokenClaims {
            user_id: user_id.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Encode)
    }

    /// Verify a token and return the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any malformed token, bad signature,
    /// algorithm other than HS256, or missing `user_id` claim.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                AuthError::InvalidToken(e)
            })
    }
}
