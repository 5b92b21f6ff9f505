//! Per-user search history.
//!
//! History is a bounded, newest-first list. Recording a search inserts at the
//! front; once the list holds [`MAX_HISTORY_ENTRIES`] entries the oldest one is
//! evicted.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricetator_core::{HistoryEntryId, UserId};

/// Maximum number of entries kept per user.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// One past search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// Unique within the owning user's history.
    pub id: HistoryEntryId,
    /// Product name as searched (trimmed).
    pub product: String,
    /// When the search ran.
    pub timestamp: DateTime<Utc>,
    /// Number of offers that survived normalization.
    pub results_count: usize,
}

/// Bounded newest-first history for a single user.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<SearchHistoryEntry>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchHistory {
    /// Empty history with the standard capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_ENTRIES)
    }

    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a search at the front of the list, evicting the oldest entry on
    /// overflow.
    ///
    /// The entry ID is derived from the user and `now`; if an entry with the
    /// same ID is already present the timestamp component is bumped by one
    /// microsecond until the ID is unique.
    pub fn record(
        &mut self,
        user_id: &UserId,
        product: &str,
        results_count: usize,
        now: DateTime<Utc>,
    ) -> SearchHistoryEntry {
        let mut micros = now.timestamp_micros();
        let mut id = HistoryEntryId::derive(user_id, micros);
        while self.contains(&id) {
            micros += 1;
            id = HistoryEntryId::derive(user_id, micros);
        }

        let entry = SearchHistoryEntry {
            id,
            product: product.to_owned(),
            timestamp: now,
            results_count,
        };

        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        entry
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &HistoryEntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, id: &HistoryEntryId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &SearchHistoryEntry> {
        self.entries.iter()
    }

    /// Snapshot of the entries, newest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<SearchHistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}
