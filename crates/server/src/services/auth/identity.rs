//! Unverified Google identity bootstrap.
//!
//! The payload segment of the assertion is decoded and its claims are trusted
//! as-is: no signature, issuer, audience or expiry check happens here. If the
//! assertion cannot be decoded at all, a synthetic test identity is fabricated
//! instead of rejecting the request. Only serve this behind the
//! `allow_unverified_identity` flag.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use pricetator_core::UserId;

use super::IdentityError;
use crate::models::NewUser;

const DEFAULT_EMAIL: &str = "user@example.com";
const DEFAULT_NAME: &str = "User";

const SYNTHETIC_EMAIL: &str = "test@example.com";
const SYNTHETIC_NAME: &str = "Test User";
const SYNTHETIC_PICTURE: &str = "https://via.placeholder.com/150";

/// Claims read from the assertion payload.
#[derive(Debug, Default, Deserialize)]
struct IdentityClaims {
    sub: Option<Value>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Outcome of the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// Identity to upsert.
    pub user: NewUser,
    /// `true` when the assertion was undecodable and the identity is fabricated.
    pub synthetic: bool,
}

/// Resolve an identity assertion into a user, falling back to a synthetic
/// identity on any decode failure.
#[must_use]
pub fn bootstrap_identity(assertion: &str, now: DateTime<Utc>) -> Bootstrap {
    match decode_unverified(assertion, now) {
        Ok(user) => Bootstrap {
            user,
            synthetic: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Identity assertion undecodable, using synthetic user");
            Bootstrap {
                user: synthetic_user(now),
                synthetic: true,
            }
        }
    }
}

/// Decode the payload segment of `header.payload.signature` without checking
/// the signature. Missing claims get defaults.
///
/// # Errors
///
/// Returns `IdentityError` if the assertion is not three segments, or the
/// payload is not base64url-encoded JSON claims.
pub fn decode_unverified(assertion: &str, now: DateTime<Utc>) -> Result<NewUser, IdentityError> {
    let segments: Vec<&str> = assertion.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(IdentityError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: IdentityClaims = serde_json::from_slice(&bytes)?;

    let user_id = claims
        .sub
        .as_ref()
        .and_then(subject_text)
        .filter(|sub| !sub.is_empty())
        .unwrap_or_else(|| format!("user_{}", now.timestamp_millis()));

    Ok(NewUser {
        user_id: UserId::new(user_id),
        email: claims.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
        name: claims.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        picture: claims.picture.unwrap_or_default(),
    })
}

/// Subject claims arrive as strings or numbers depending on the issuer.
fn subject_text(sub: &Value) -> Option<String> {
    match sub {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Fabricated identity used when the assertion cannot be decoded.
#[must_use]
pub fn synthetic_user(now: DateTime<Utc>) -> NewUser {
    NewUser {
        user_id: UserId::new(format!("test_user_{}", now.timestamp_millis())),
        email: SYNTHETIC_EMAIL.to_string(),
        name: SYNTHETIC_NAME.to_string(),
        picture: SYNTHETIC_PICTURE.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assertion(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.not-a-real-signature")
    }

    #[test]
    fn test_decodes_all_claims() {
        let token = assertion(&serde_json::json!({
            "sub": "1122334455",
            "email": "asha@gmail.com",
            "name": "Asha Rao",
            "picture": "https://lh3.googleusercontent.com/a/photo",
        }));

        let user = decode_unverified(&token, Utc::now()).unwrap();
        assert_eq!(user.user_id.as_str(), "1122334455");
        assert_eq!(user.email, "asha@gmail.com");
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.picture, "https://lh3.googleusercontent.com/a/photo");
    }

    #[test]
    fn test_missing_claims_get_defaults() {
        let now = Utc::now();
        let token = assertion(&serde_json::json!({}));

        let user = decode_unverified(&token, now).unwrap();
        assert_eq!(user.user_id.as_str(), format!("user_{}", now.timestamp_millis()));
        assert_eq!(user.email, DEFAULT_EMAIL);
        assert_eq!(user.name, DEFAULT_NAME);
        assert_eq!(user.picture, "");
    }

    #[test]
    fn test_numeric_subject_is_kept() {
        let token = assertion(&serde_json::json!({ "sub": 1_234_567_890_u64 }));
        let outcome = bootstrap_identity(&token, Utc::now());

        assert!(!outcome.synthetic);
        assert_eq!(outcome.user.user_id.as_str(), "1234567890");
    }

    #[test]
    fn test_null_subject_gets_default() {
        let now = Utc::now();
        let token = assertion(&serde_json::json!({ "sub": null, "email": "a@b.c" }));

        let user = decode_unverified(&token, now).unwrap();
        assert_eq!(user.user_id.as_str(), format!("user_{}", now.timestamp_millis()));
        assert_eq!(user.email, "a@b.c");
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"p"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode_unverified(&token, Utc::now()).unwrap().user_id.as_str(), "p");
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        assert!(matches!(
            decode_unverified("just-one-segment", Utc::now()),
            Err(IdentityError::Malformed)
        ));
        assert!(matches!(
            decode_unverified("a.b.c.d", Utc::now()),
            Err(IdentityError::Malformed)
        ));
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let payload = URL_SAFE_NO_PAD.encode("[1,2,3]");
        let token = format!("h.{payload}.s");
        assert!(matches!(
            decode_unverified(&token, Utc::now()),
            Err(IdentityError::Claims(_))
        ));
    }

    #[test]
    fn test_bootstrap_falls_back_to_synthetic_user() {
        let now = Utc::now();
        let outcome = bootstrap_identity("garbage", now);

        assert!(outcome.synthetic);
        assert_eq!(
            outcome.user.user_id.as_str(),
            format!("test_user_{}", now.timestamp_millis())
        );
        assert_eq!(outcome.user.email, SYNTHETIC_EMAIL);
        assert_eq!(outcome.user.name, SYNTHETIC_NAME);
    }

    #[test]
    fn test_bootstrap_uses_decoded_identity() {
        let token = assertion(&serde_json::json!({ "sub": "42" }));
        let outcome = bootstrap_identity(&token, Utc::now());

        assert!(!outcome.synthetic);
        assert_eq!(outcome.user.user_id.as_str(), "42");
    }
}
