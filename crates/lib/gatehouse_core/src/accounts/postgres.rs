//! PostgreSQL account repository.
//!
//! Email uniqueness is enforced by the `accounts_email_key` unique index; a
//! violation on insert is reported as `AuthError::DuplicateEmail`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AccountRepository;
use crate::auth::AuthError;
use crate::models::account::{Account, NewAccountRecord, Role};
use crate::uuid::uuidv7;

type AccountRow = (
    Uuid,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, role, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: AccountRow) -> Result<Account, AuthError> {
    let (id, name, email, password_hash, role, created_at, updated_at, deleted_at) = row;
    // The CHECK constraint keeps this unreachable unless the schema drifts.
    let role: Role = role
        .parse()
        .map_err(|_| AuthError::Internal(format!("account {id} has unknown role '{role}'")))?;
    Ok(Account {
        id,
        name,
        email,
        password_hash,
        role,
        created_at,
        updated_at,
        deleted_at,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, record: NewAccountRecord) -> Result<Account, AuthError> {
        let sql = format!(
            "INSERT INTO accounts (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(uuidv7())
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.password_hash)
            .bind(record.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::DuplicateEmail
                } else {
                    AuthError::from(e)
                }
            })?;
        account_from_row(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(account_from_row).transpose()
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, AuthError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE role = $1 AND deleted_at IS NULL",
        )
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
