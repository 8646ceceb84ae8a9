//! Request and response bodies.

use gatehouse_core::models::account::PublicAccount;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Shape checks done before the request reaches the core.
    pub fn validate(&self, min_password_length: usize) -> AppResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".into()));
        }
        if self.password.chars().count() < min_password_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {min_password_length} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub account: PublicAccount,
}

#[derive(Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn login_request_shape_is_checked() {
        assert!(request("alice@x.com", "secret123").validate(6).is_ok());
        assert!(matches!(
            request("", "secret123").validate(6),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            request("alice", "secret123").validate(6),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            request("alice@x.com", "12345").validate(6),
            Err(AppError::Validation(_))
        ));
    }
}
