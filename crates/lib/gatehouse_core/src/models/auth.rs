//! Token claim models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Role;

/// JWT claims embedded in session tokens. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the account id (standard JWT `sub` claim).
    #[serde(rename = "sub")]
    pub account_id: String,
    pub email: String,
    pub role: Role,
    /// Issued at (unix timestamp).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry (unix timestamp).
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(rename = "iss")]
    pub issuer: String,
}

impl TokenClaims {
    /// The subject parsed back into an account id.
    pub fn account_uuid(&self) -> Option<Uuid> {
        crate::uuid::parse_account_id(&self.account_id)
    }
}
