//! API server configuration.

use gatehouse_core::auth::AuthError;
use gatehouse_core::settings::{AuthSettings, BootstrapSettings};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Hashing, signing and password policy.
    pub auth: AuthSettings,
    /// Superadmin to provision on first start, if configured.
    pub bootstrap: Option<BootstrapSettings>,
}

impl ApiConfig {
    /// Combine listener settings with auth settings read from the environment.
    ///
    /// Fails when `JWT_SECRET` is missing; see `gatehouse_core::settings`.
    pub fn from_env(bind_addr: String, pg_connection_url: String) -> Result<Self, AuthError> {
        Self::from_lookup(bind_addr, pg_connection_url, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        bind_addr: String,
        pg_connection_url: String,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AuthError> {
        let auth = AuthSettings::from_lookup(&lookup)?;
        let bootstrap = BootstrapSettings::from_lookup(&lookup);
        Ok(Self {
            bind_addr,
            pg_connection_url,
            auth,
            bootstrap,
        })
    }
}
