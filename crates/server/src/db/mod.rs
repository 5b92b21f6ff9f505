//! User and search-history storage.
//!
//! Handlers never touch a concrete store: they go through the [`UserStore`]
//! trait held in `AppState`, so a persistent backend can replace
//! [`MemoryStore`] without changing route code.
//!
//! # Stores
//!
//! - [`MemoryStore`] - Process-lifetime maps, reset on restart

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use pricetator_core::{HistoryEntryId, UserId};

use crate::models::{NewUser, SearchHistoryEntry, User};

/// Errors returned by [`UserStore`] implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),
}

/// Storage capability set used by the route handlers.
///
/// All operations are keyed by user ID and are last-writer-wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the existing user for `new.user_id`, or create it together with
    /// an empty history.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn upsert_user(&self, new: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Replace the user's display name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn update_name(&self, user_id: &UserId, name: &str) -> Result<User, RepositoryError>;

    /// Record a search at the front of the user's history.
    ///
    /// Recording succeeds even if no profile exists for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn append_history(
        &self,
        user_id: &UserId,
        product: &str,
        results_count: usize,
    ) -> Result<SearchHistoryEntry, RepositoryError>;

    /// History entries, newest first. Unknown users have an empty history.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn list_history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SearchHistoryEntry>, RepositoryError>;

    /// Delete one entry. Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn delete_history_entry(
        &self,
        user_id: &UserId,
        entry_id: &HistoryEntryId,
    ) -> Result<bool, RepositoryError>;

    /// Remove every entry from the user's history.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn clear_history(&self, user_id: &UserId) -> Result<(), RepositoryError>;

    /// Current number of history entries for the user.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store cannot complete the operation.
    async fn search_count(&self, user_id: &UserId) -> Result<usize, RepositoryError>;
}
