//! Account store.
//!
//! `AccountStore` validates and hashes before handing a record to an
//! `AccountRepository`. Repositories own atomic email uniqueness; the store
//! never re-implements it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::{MAX_PASSWORD_BYTES, PasswordHasher};
use crate::models::account::{Account, NewAccount, NewAccountRecord, Role, normalize_email};

pub use memory::MemoryAccountRepository;
pub use postgres::PgAccountRepository;

/// Default minimum password length.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Persistence collaborator for accounts.
///
/// `insert` must be atomic with respect to email uniqueness: of two concurrent
/// inserts with the same email exactly one succeeds and the other returns
/// `AuthError::DuplicateEmail`. Lookups never return soft-deleted accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account, assigning its id and timestamps.
    async fn insert(&self, record: NewAccountRecord) -> Result<Account, AuthError>;

    /// Fetch an account by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;

    /// Count live accounts holding a role.
    async fn count_by_role(&self, role: Role) -> Result<i64, AuthError>;
}

/// Account creation and lookup on top of a repository.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    min_password_length: usize,
}

impl AccountStore {
    pub fn new(
        repo: Arc<dyn AccountRepository>,
        hasher: PasswordHasher,
        min_password_length: usize,
    ) -> Self {
        Self {
            repo,
            hasher,
            min_password_length,
        }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Validate, hash and persist a new account.
    pub async fn create(&self, input: NewAccount) -> Result<Account, AuthError> {
        let role: Role = input.role.parse()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".into()));
        }

        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Email must be a valid address".into()));
        }

        if input.password.chars().count() < self.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        if input.password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Validation(format!(
                "Password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        // Fail fast before paying for bcrypt; the repository insert stays the real guard.
        if self.repo.find_by_email(&email).await?.is_some() {
            debug!(email = %email, "account creation rejected: email taken");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_blocking(input.password).await?;

        let account = self
            .repo
            .insert(NewAccountRecord {
                name: name.to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(account_id = %account.id, email = %account.email, role = %account.role, "account created");
        Ok(account)
    }

    /// Fetch an account by email; `NotFound` if absent.
    pub async fn find_by_email(&self, email: &str) -> Result<Account, AuthError> {
        self.repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Fetch an account by id; `NotFound` if absent.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Account, AuthError> {
        self.repo.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    /// Whether any live account holds the role.
    pub async fn role_exists(&self, role: Role) -> Result<bool, AuthError> {
        Ok(self.repo.count_by_role(role).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::MIN_BCRYPT_COST;

    fn store() -> AccountStore {
        AccountStore::new(
            Arc::new(MemoryAccountRepository::new()),
            PasswordHasher::new(MIN_BCRYPT_COST).unwrap(),
            DEFAULT_MIN_PASSWORD_LENGTH,
        )
    }

    #[tokio::test]
    async fn create_hashes_and_assigns_id() {
        let store = store();
        let account = store
            .create(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
            .await
            .unwrap();

        assert_eq!(account.role, Role::Admin);
        assert_ne!(account.password_hash, "secret123");
        assert!(!account.password_hash.is_empty());
        assert!(store.hasher().verify("secret123", &account.password_hash).unwrap());

        let by_id = store.find_by_id(account.id).await.unwrap();
        assert_eq!(by_id, account);
        let by_email = store.find_by_email("alice@x.com").await.unwrap();
        assert_eq!(by_email.id, account.id);
    }

    #[tokio::test]
    async fn create_rejects_unknown_role() {
        let err = store()
            .create(NewAccount::new("Eve", "eve@x.com", "secret123", "root"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRole(r) if r == "root"));
    }

    #[tokio::test]
    async fn create_rejects_padded_role() {
        let store = store();
        for role in [" admin ", "admin\n", "Superadmin"] {
            let err = store
                .create(NewAccount::new("Eve", "eve@x.com", "secret123", role))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidRole(_)), "accepted {role:?}");
        }
        assert!(!store.role_exists(Role::Admin).await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_case_insensitively() {
        let store = store();
        store
            .create(NewAccount::new("Alice", "alice@x.com", "secret123", "admin"))
            .await
            .unwrap();
        let err = store
            .create(NewAccount::new("Alice 2", " ALICE@x.com", "secret456", "superadmin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn create_validates_input_shape() {
        let store = store();
        for input in [
            NewAccount::new("", "a@x.com", "secret123", "admin"),
            NewAccount::new("A", "", "secret123", "admin"),
            NewAccount::new("A", "not-an-email", "secret123", "admin"),
            NewAccount::new("A", "a@x.com", "12345", "admin"),
            NewAccount::new("A", "a@x.com", &"p".repeat(MAX_PASSWORD_BYTES + 1), "admin"),
        ] {
            let err = store.create(input).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "unexpected: {err:?}");
        }
    }

    #[tokio::test]
    async fn lookups_report_not_found() {
        let store = store();
        assert!(matches!(
            store.find_by_email("nobody@x.com").await,
            Err(AuthError::NotFound)
        ));
        assert!(matches!(
            store.find_by_id(crate::uuid::uuidv7()).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn role_exists_tracks_creations() {
        let store = store();
        assert!(!store.role_exists(Role::Superadmin).await.unwrap());
        store
            .create(NewAccount::new("Root", "root@x.com", "secret123", "superadmin"))
            .await
            .unwrap();
        assert!(store.role_exists(Role::Superadmin).await.unwrap());
        assert!(!store.role_exists(Role::Admin).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_with_same_email_yield_one_account() {
        let store = store();
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(NewAccount::new(
                        format!("Racer {i}"),
                        "race@x.com",
                        "secret123",
                        "admin",
                    ))
                    .await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AuthError::DuplicateEmail) => duplicates += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
    }
}
