//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT issuance/validation and the login service
//! built on top of the account store.

pub mod jwt;
pub mod password;
pub mod service;

use thiserror::Error;

/// Generic text for failed logins. Unknown email and wrong password share it.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Generic text for any token that fails validation.
pub const UNAUTHENTICATED_MESSAGE: &str = "unauthenticated";

/// Generic text for infrastructure failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Why a token was rejected. Callers must treat every variant as "unauthenticated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token uses an unexpected signing algorithm")]
    AlgorithmMismatch,
}

/// Failure inside the password hasher.
#[derive(Debug, Error)]
pub enum HashingError {
    #[error("cannot hash an empty password")]
    EmptyPassword,

    #[error("password exceeds 72 bytes")]
    PasswordTooLong,

    #[error("stored password hash is malformed")]
    MalformedHash,

    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Account not found")]
    NotFound,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Hashing error: {0}")]
    Hashing(#[from] HashingError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for failures of the infrastructure rather than of the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Hashing(_)
                | AuthError::Configuration(_)
                | AuthError::DbError(_)
                | AuthError::Internal(_)
        )
    }

    /// The only text that may be shown to an end user for this error.
    ///
    /// Token failures collapse into one message and infrastructure failures
    /// never carry their underlying error text.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AuthError::DuplicateEmail => "email already registered".to_string(),
            AuthError::InvalidRole(role) => {
                format!("invalid role '{role}', expected one of: admin, superadmin")
            }
            AuthError::NotFound => "account not found".to_string(),
            AuthError::Token(_) => UNAUTHENTICATED_MESSAGE.to_string(),
            AuthError::Hashing(_)
            | AuthError::Configuration(_)
            | AuthError::DbError(_)
            | AuthError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_share_one_public_message() {
        let messages: Vec<String> = [
            TokenError::Malformed,
            TokenError::SignatureInvalid,
            TokenError::Expired,
            TokenError::AlgorithmMismatch,
        ]
        .into_iter()
        .map(|e| AuthError::from(e).public_message())
        .collect();
        assert!(messages.iter().all(|m| m == UNAUTHENTICATED_MESSAGE));
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AuthError::DbError(sqlx::Error::PoolTimedOut);
        assert!(err.is_internal());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let err = AuthError::Internal("connection refused at 10.0.0.3".into());
        assert!(!err.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn credential_errors_are_not_internal() {
        assert!(!AuthError::InvalidCredentials.is_internal());
        assert_eq!(
            AuthError::InvalidCredentials.public_message(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }
}
