//! # roster_core
//!
//! Core domain logic for Roster: user storage, password hashing, token
//! issuance and the registration flow that ties them together.

pub mod auth;
pub mod migrate;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
