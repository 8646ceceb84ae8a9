//! Authentication service: login, account creation and token validation.
//!
//! Login either completes every step and returns a token with a sanitized
//! account, or fails without exposing anything about the account.

use tracing::{debug, error, info, warn};

use super::AuthError;
use super::jwt::TokenKeys;
use crate::accounts::AccountStore;
use crate::models::account::{NewAccount, PublicAccount};
use crate::models::auth::TokenClaims;

/// Verified against when the email is unknown, so both failure paths cost one bcrypt check.
const DUMMY_PASSWORD: &str = "gatehouse-timing-equalizer";

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub account: PublicAccount,
}

#[derive(Clone)]
pub struct AuthService {
    store: AccountStore,
    keys: TokenKeys,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(store: AccountStore, keys: TokenKeys) -> Result<Self, AuthError> {
        let dummy_hash = store.hasher().hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            keys,
            dummy_hash,
        })
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// Authenticate with email + password.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`;
    /// infrastructure failures yield `Internal` with the cause only logged.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let account = match self.store.find_by_email(email).await {
            Ok(account) => Some(account),
            Err(AuthError::NotFound) => None,
            Err(e) => return Err(internal("account lookup", e)),
        };

        let Some(account) = account else {
            // Keep timing comparable with the wrong-password path.
            let _ = self
                .store
                .hasher()
                .verify_blocking(password.to_string(), self.dummy_hash.clone())
                .await;
            debug!(reason = "unknown_email", "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = self
            .store
            .hasher()
            .verify_blocking(password.to_string(), account.password_hash.clone())
            .await
            .map_err(|e| internal("password verification", e.into()))?;
        if !matches {
            warn!(account_id = %account.id, reason = "wrong_password", "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(account.id, &account.email, account.role)
            .map_err(|e| internal("token issuance", e))?;

        info!(account_id = %account.id, role = %account.role, "login succeeded");
        Ok(LoginOutcome {
            token,
            account: account.into(),
        })
    }

    /// Create an account (bootstrap/admin path).
    pub async fn create_account(&self, input: NewAccount) -> Result<PublicAccount, AuthError> {
        match self.store.create(input).await {
            Ok(account) => Ok(account.into()),
            Err(e) if e.is_internal() => Err(internal("account creation", e)),
            Err(e) => Err(e),
        }
    }

    /// Validate a bearer token issued by this service.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.keys.validate(token).map_err(|e| {
            debug!(reason = %e, "token rejected");
            AuthError::Token(e)
        })
    }

    /// Resolve the account a validated token refers to.
    ///
    /// A token whose subject no longer exists is treated as unauthenticated.
    pub async fn account_for_claims(
        &self,
        claims: &TokenClaims,
    ) -> Result<PublicAccount, AuthError> {
        let id = claims
            .account_uuid()
            .ok_or(AuthError::Token(super::TokenError::Malformed))?;
        match self.store.find_by_id(id).await {
            Ok(account) => Ok(account.into()),
            Err(AuthError::NotFound) => {
                debug!(account_id = %id, reason = "subject_missing", "token rejected");
                Err(AuthError::Token(super::TokenError::Malformed))
            }
            Err(e) => Err(internal("account lookup", e)),
        }
    }
}

/// Log the underlying cause and return a detail-free internal error.
fn internal(stage: &str, cause: AuthError) -> AuthError {
    error!(stage, error = %cause, "authentication infrastructure failure");
    AuthError::Internal(format!("{stage} failed"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::accounts::{
        AccountRepository, DEFAULT_MIN_PASSWORD_LENGTH, MemoryAccountRepository,
    };
    use crate::auth::TokenError;
    use crate::auth::jwt::DEFAULT_TOKEN_LIFETIME_SECS;
    use crate::auth::password::{MAX_PASSWORD_BYTES, MIN_BCRYPT_COST, PasswordHasher};
    use crate::models::account::{Account, NewAccountRecord, Role};

    const SECRET: &[u8] = b"service-test-secret";

    fn service_with(repo: Arc<dyn AccountRepository>) -> AuthService {
        let store = AccountStore::new(
            repo,
            PasswordHasher::new(MIN_BCRYPT_COST).unwrap(),
            DEFAULT_MIN_PASSWORD_LENGTH,
        );
        let keys = TokenKeys::new(SECRET, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS)).unwrap();
        AuthService::new(store, keys).unwrap()
    }

    fn service() -> AuthService {
        service_with(Arc::new(MemoryAccountRepository::new()))
    }

    async fn with_alice() -> AuthService {
        let svc = service();
        svc.create_account(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
            .await
            .unwrap();
        svc
    }

    #[tokio::test]
    async fn login_issues_token_carrying_role() {
        let svc = with_alice().await;
        let outcome = svc.login("alice@x.com", "secret123").await.unwrap();

        let claims = svc.validate_token(&outcome.token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.account_id, outcome.account.id.to_string());
        assert_eq!(outcome.account.name, "Alice");
    }

    #[tokio::test]
    async fn login_matches_email_case_insensitively() {
        let svc = with_alice().await;
        assert!(svc.login("Alice@X.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let svc = with_alice().await;
        let unknown = svc.login("nobody@x.com", "secret123").await.unwrap_err();
        let wrong = svc.login("alice@x.com", "wrongpass").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.public_message(), wrong.public_message());
    }

    #[tokio::test]
    async fn login_rejects_suffix_beyond_bcrypt_input_limit() {
        let svc = service();
        let password = "p".repeat(MAX_PASSWORD_BYTES);
        svc.create_account(NewAccount::new("Long", "long@x.com", password.clone(), "admin"))
            .await
            .unwrap();

        assert!(svc.login("long@x.com", &password).await.is_ok());
        let err = svc
            .login("long@x.com", &format!("{password}-anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn validate_token_rejects_tampering() {
        let svc = with_alice().await;
        let outcome = svc.login("alice@x.com", "secret123").await.unwrap();
        let mut tampered = outcome.token.clone();
        tampered.push('x');
        assert!(matches!(
            svc.validate_token(&tampered),
            Err(AuthError::Token(_))
        ));
    }

    #[tokio::test]
    async fn account_for_claims_resolves_subject() {
        let svc = with_alice().await;
        let outcome = svc.login("alice@x.com", "secret123").await.unwrap();
        let claims = svc.validate_token(&outcome.token).unwrap();
        let account = svc.account_for_claims(&claims).await.unwrap();
        assert_eq!(account, outcome.account);
    }

    #[tokio::test]
    async fn account_for_claims_rejects_vanished_subject() {
        let repo = Arc::new(MemoryAccountRepository::new());
        let svc = service_with(repo.clone());
        let created = svc
            .create_account(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
            .await
            .unwrap();
        let outcome = svc.login("alice@x.com", "secret123").await.unwrap();
        let claims = svc.validate_token(&outcome.token).unwrap();

        repo.soft_delete(created.id);
        assert!(matches!(
            svc.account_for_claims(&claims).await,
            Err(AuthError::Token(TokenError::Malformed))
        ));
    }

    /// Repository whose every call fails like an unreachable database.
    struct BrokenRepository;

    #[async_trait]
    impl AccountRepository for BrokenRepository {
        async fn insert(&self, _record: NewAccountRecord) -> Result<Account, AuthError> {
            Err(AuthError::DbError(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, AuthError> {
            Err(AuthError::DbError(sqlx::Error::PoolTimedOut))
        }
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Account>, AuthError> {
            Err(AuthError::DbError(sqlx::Error::PoolTimedOut))
        }
        async fn count_by_role(&self, _role: Role) -> Result<i64, AuthError> {
            Err(AuthError::DbError(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn persistence_failure_is_internal_without_detail() {
        let svc = service_with(Arc::new(BrokenRepository));
        let err = svc.login("alice@x.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
        assert!(!err.to_string().contains("pool timed out"));

        let err = svc
            .create_account(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn create_account_returns_public_view() {
        let svc = service();
        let account = svc
            .create_account(NewAccount::new("Root", "root@x.com", "secret123", "superadmin"))
            .await
            .unwrap();
        assert_eq!(account.role, Role::Superadmin);
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("passwordHash").is_none());
    }
}
