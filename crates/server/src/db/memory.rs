//! In-memory [`UserStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pricetator_core::{HistoryEntryId, UserId};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, SearchHistory, SearchHistoryEntry, User};

/// Users and their histories, held for the life of the process.
///
/// Both maps sit behind one lock so every operation sees them in a consistent
/// state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    history: HashMap<UserId, SearchHistory>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.inner.write().await;

        if let Some(existing) = tables.users.get(&new.user_id) {
            return Ok(existing.clone());
        }

        let user = new.into_user(Utc::now());
        tables
            .history
            .entry(user.user_id.clone())
            .or_default();
        tables.users.insert(user.user_id.clone(), user.clone());

        tracing::debug!(user_id = %user.user_id, "Created user");
        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }

    async fn update_name(&self, user_id: &UserId, name: &str) -> Result<User, RepositoryError> {
        let mut tables = self.inner.write().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::NotFound(user_id.clone()))?;

        name.clone_into(&mut user.name);
        Ok(user.clone())
    }

    async fn append_history(
        &self,
        user_id: &UserId,
        product: &str,
        results_count: usize,
    ) -> Result<SearchHistoryEntry, RepositoryError> {
        let mut tables = self.inner.write().await;
        let entry = tables
            .history
            .entry(user_id.clone())
            .or_default()
            .record(user_id, product, results_count, Utc::now());
        Ok(entry)
    }

    async fn list_history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SearchHistoryEntry>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .history
            .get(user_id)
            .map(SearchHistory::to_vec)
            .unwrap_or_default())
    }

    async fn delete_history_entry(
        &self,
        user_id: &UserId,
        entry_id: &HistoryEntryId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.inner.write().await;
        Ok(tables
            .history
            .get_mut(user_id)
            .is_some_and(|history| history.remove(entry_id)))
    }

    async fn clear_history(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        let mut tables = self.inner.write().await;
        tables.history.entry(user_id.clone()).or_default().clear();
        Ok(())
    }

    async fn search_count(&self, user_id: &UserId) -> Result<usize, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .history
            .get(user_id)
            .map_or(0, SearchHistory::len))
    }
}
