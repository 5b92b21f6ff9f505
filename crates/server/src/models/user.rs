//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricetator_core::UserId;

/// A signed-in user.
///
/// Created the first time an identity is seen and kept for the life of the
/// store. Only the display name is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider subject (or a synthetic test ID).
    pub user_id: UserId,
    /// Email address from the identity claims.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL (may be empty).
    pub picture: String,
    /// When the user was first seen.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user on first sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub picture: String,
}

impl NewUser {
    /// Materialize the user with its creation timestamp.
    #[must_use]
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
            name: self.name,
            picture: self.picture,
            created_at,
        }
    }
}

/// A user together with the derived search count, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    /// Number of entries currently in the user's search history.
    pub total_searches: usize,
}

impl UserProfile {
    #[must_use]
    pub const fn new(user: User, total_searches: usize) -> Self {
        Self {
            user,
            total_searches,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serializes_flat() {
        let user = NewUser {
            user_id: UserId::new("u1"),
            email: "a@b.test".to_string(),
            name: "Asha".to_string(),
            picture: String::new(),
        }
        .into_user(Utc::now());

        let json = serde_json::to_value(UserProfile::new(user, 3)).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["name"], "Asha");
        assert_eq!(json["total_searches"], 3);
        assert!(json["created_at"].is_string());
    }
}
