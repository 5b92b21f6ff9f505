//! Domain models for the Pricetator server.
//!
//! - [`user`] - User profiles created by sign-in
//! - [`history`] - Per-user bounded search history

pub mod history;
pub mod user;

pub use history::{MAX_HISTORY_ENTRIES, SearchHistory, SearchHistoryEntry};
pub use user::{NewUser, User, UserProfile};
