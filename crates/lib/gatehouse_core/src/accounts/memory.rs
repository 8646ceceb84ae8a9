//! In-memory account repository backed by `DashMap`.
//!
//! The email index entry is held for the whole insert, which makes the
//! uniqueness check and the insert one atomic step per email.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::AccountRepository;
use crate::auth::AuthError;
use crate::models::account::{Account, NewAccountRecord, Role};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: DashMap<Uuid, Account>,
    by_email: DashMap<String, Uuid>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an account deleted without removing it.
    pub fn soft_delete(&self, id: Uuid) -> bool {
        match self.accounts.get_mut(&id) {
            Some(mut account) => {
                let now = Utc::now();
                account.deleted_at = Some(now);
                account.updated_at = now;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, record: NewAccountRecord) -> Result<Account, AuthError> {
        match self.by_email.entry(record.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let account = Account {
                    id: uuidv7(),
                    name: record.name,
                    email: record.email,
                    password_hash: record.password_hash,
                    role: record.role,
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                // Record first, then index: a lookup by email never sees a dangling id.
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                Ok(account)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let Some(id) = self.by_email.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        Ok(self
            .accounts
            .get(&id)
            .filter(|account| !account.is_deleted())
            .map(|account| account.value().clone()))
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, AuthError> {
        let count = self
            .accounts
            .iter()
            .filter(|account| account.role == role && !account.is_deleted())
            .count();
        Ok(count as i64)
    }
}
