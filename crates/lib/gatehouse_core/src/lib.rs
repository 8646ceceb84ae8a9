//! # gatehouse_core
//!
//! Core authentication logic for Gatehouse: password hashing, signed session
//! tokens, the account store and the login flow that ties them together.

pub mod accounts;
pub mod auth;
pub mod bootstrap;
pub mod migrate;
pub mod models;
pub mod settings;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
