//! Domain models shared by the store, the token layer and the API.

pub mod account;
pub mod auth;
