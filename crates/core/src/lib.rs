//! Pricetator Core - Shared domain types.
//!
//! This crate provides the types shared by the Pricetator server and its tests:
//! - `server` - JSON API backend (search, auth, history)
//! - `integration-tests` - End-to-end tests against the assembled router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. Price parsing and offer ranking live here so they can be
//! tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and ranked offers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
