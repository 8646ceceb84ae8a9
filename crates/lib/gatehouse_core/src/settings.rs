//! Authentication settings resolved from the environment.
//!
//! | Variable                          | Default          |
//! |-----------------------------------|------------------|
//! | `JWT_SECRET`                      | required         |
//! | `TOKEN_LIFETIME_SECS`             | `86400`          |
//! | `PASSWORD_MIN_LENGTH`             | `6`              |
//! | `BCRYPT_COST`                     | `10`             |
//! | `BOOTSTRAP_SUPERADMIN_EMAIL`      | unset (disabled) |
//! | `BOOTSTRAP_SUPERADMIN_PASSWORD`   | unset (disabled) |
//! | `BOOTSTRAP_SUPERADMIN_NAME`       | `Super Admin`    |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;

use crate::accounts::{AccountRepository, AccountStore, DEFAULT_MIN_PASSWORD_LENGTH};
use crate::auth::AuthError;
use crate::auth::jwt::{DEFAULT_TOKEN_LIFETIME_SECS, TokenKeys};
use crate::auth::password::{DEFAULT_BCRYPT_COST, PasswordHasher};
use crate::auth::service::AuthService;

pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const TOKEN_LIFETIME_VAR: &str = "TOKEN_LIFETIME_SECS";
pub const PASSWORD_MIN_LENGTH_VAR: &str = "PASSWORD_MIN_LENGTH";
pub const BCRYPT_COST_VAR: &str = "BCRYPT_COST";
pub const BOOTSTRAP_EMAIL_VAR: &str = "BOOTSTRAP_SUPERADMIN_EMAIL";
pub const BOOTSTRAP_PASSWORD_VAR: &str = "BOOTSTRAP_SUPERADMIN_PASSWORD";
pub const BOOTSTRAP_NAME_VAR: &str = "BOOTSTRAP_SUPERADMIN_NAME";

const DEFAULT_BOOTSTRAP_NAME: &str = "Super Admin";

/// Settings for hashing, token signing and password policy.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub min_password_length: usize,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("min_password_length", &self.min_password_length)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthSettings {
    /// Settings with defaults for everything except the secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// A missing or blank `JWT_SECRET` is an error; there is no fallback secret.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let jwt_secret = lookup(JWT_SECRET_VAR)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AuthError::Configuration(format!("{JWT_SECRET_VAR} must be set and non-empty"))
            })?;

        let lifetime_secs: i64 =
            parse_or(&lookup, TOKEN_LIFETIME_VAR, DEFAULT_TOKEN_LIFETIME_SECS)?;
        if lifetime_secs <= 0 {
            return Err(AuthError::Configuration(format!(
                "{TOKEN_LIFETIME_VAR} must be positive"
            )));
        }

        let min_password_length: usize =
            parse_or(&lookup, PASSWORD_MIN_LENGTH_VAR, DEFAULT_MIN_PASSWORD_LENGTH)?;
        if min_password_length == 0 {
            return Err(AuthError::Configuration(format!(
                "{PASSWORD_MIN_LENGTH_VAR} must be at least 1"
            )));
        }

        let bcrypt_cost: u32 = parse_or(&lookup, BCRYPT_COST_VAR, DEFAULT_BCRYPT_COST)?;
        PasswordHasher::new(bcrypt_cost)?;

        Ok(Self {
            jwt_secret,
            token_lifetime: Duration::seconds(lifetime_secs),
            min_password_length,
            bcrypt_cost,
        })
    }

    /// Assemble the authentication service over a repository.
    pub fn build_service(&self, repo: Arc<dyn AccountRepository>) -> Result<AuthService, AuthError> {
        let hasher = PasswordHasher::new(self.bcrypt_cost)?;
        let store = AccountStore::new(repo, hasher, self.min_password_length);
        let keys = TokenKeys::new(self.jwt_secret.as_bytes(), self.token_lifetime)?;
        AuthService::new(store, keys)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AuthError> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AuthError::Configuration(format!("{key} has invalid value '{raw}'"))),
    }
}

/// Credentials for the superadmin created on first start.
#[derive(Clone)]
pub struct BootstrapSettings {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BootstrapSettings {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `None` unless both email and password are configured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let email = lookup(BOOTSTRAP_EMAIL_VAR).filter(|v| !v.trim().is_empty())?;
        let password = lookup(BOOTSTRAP_PASSWORD_VAR).filter(|v| !v.is_empty())?;
        let name = lookup(BOOTSTRAP_NAME_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOOTSTRAP_NAME.to_string());
        Some(Self {
            name,
            email,
            password,
        })
    }
}
