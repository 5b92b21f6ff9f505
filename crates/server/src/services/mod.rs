//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Bearer token issue/validation and the unverified sign-in bootstrap
//! - `search` - Search orchestration (provider call, history, ranking)

pub mod auth;
pub mod search;
