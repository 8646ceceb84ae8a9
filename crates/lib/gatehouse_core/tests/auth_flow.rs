//! End-to-end login flow over the in-memory repository.

use std::sync::Arc;

use gatehouse_core::accounts::MemoryAccountRepository;
use gatehouse_core::auth::{AuthError, INVALID_CREDENTIALS_MESSAGE};
use gatehouse_core::auth::jwt::validate_token;
use gatehouse_core::models::account::{NewAccount, Role};
use gatehouse_core::settings::AuthSettings;

const SECRET: &str = "integration-secret";

#[tokio::test]
async fn create_login_and_validate() {
    let mut settings = AuthSettings::with_secret(SECRET);
    settings.bcrypt_cost = 4;
    let svc = settings
        .build_service(Arc::new(MemoryAccountRepository::new()))
        .expect("build service");

    svc.create_account(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
        .await
        .expect("create alice");

    let outcome = svc
        .login("alice@x.com", "secret123")
        .await
        .expect("login with correct password");

    // Any holder of the secret can verify the token, not just the service.
    let claims = validate_token(&outcome.token, SECRET.as_bytes()).expect("validate token");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.account_id, outcome.account.id.to_string());

    let err = svc
        .login("alice@x.com", "wrongpass")
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.public_message(), INVALID_CREDENTIALS_MESSAGE);
}

#[tokio::test]
async fn tokens_from_another_secret_are_rejected() {
    let mut settings = AuthSettings::with_secret(SECRET);
    settings.bcrypt_cost = 4;
    let svc = settings
        .build_service(Arc::new(MemoryAccountRepository::new()))
        .expect("build service");
    svc.create_account(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
        .await
        .expect("create alice");
    let outcome = svc.login("alice@x.com", "secret123").await.expect("login");

    let err = validate_token(&outcome.token, b"some-other-secret").expect_err("must reject");
    assert!(matches!(err, AuthError::Token(_)));
}
