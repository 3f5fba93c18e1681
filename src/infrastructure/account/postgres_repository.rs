//! PostgreSQL account repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::user::UserId;
use crate::domain::{DomainError, EntityKind};
use crate::infrastructure::user::is_unique_violation;

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, token, user_id, created_at, \
                               updated_at, last_login_at";

/// PostgreSQL implementation of AccountRepository
///
/// Username and token uniqueness are enforced by table constraints, so a
/// losing concurrent write surfaces as `AlreadyExists`.
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1");

        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to get account by username: {}", e))
            })?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Account>, DomainError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE token = $1");

        let row = sqlx::query(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account by token: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, token, user_id,
                                  created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.token())
        .bind(account.user_id().as_uuid())
        .bind(account.created_at())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(
                    EntityKind::Account,
                    format!("Username '{}' already exists", account.username()),
                )
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2, password_hash = $3, token = $4, user_id = $5,
                updated_at = $6, last_login_at = $7
            WHERE id = $1
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.token())
        .bind(account.user_id().as_uuid())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(
                    EntityKind::Account,
                    format!(
                        "Username or session token of account '{}' already taken",
                        account.id()
                    ),
                )
            } else {
                DomainError::storage(format!("Failed to update account: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                EntityKind::Account,
                format!("Account '{}' not found", account.id()),
            ));
        }

        Ok(account.clone())
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        rows.iter().map(row_to_account).collect()
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Failed to read account row: {}", e));

    let id: Uuid = row.try_get("id").map_err(column_error)?;
    let user_id: Uuid = row.try_get("user_id").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;
    let last_login_at: Option<DateTime<Utc>> =
        row.try_get("last_login_at").map_err(column_error)?;

    Ok(Account::from_parts(
        AccountId::from_uuid(id),
        row.try_get("username").map_err(column_error)?,
        row.try_get("password_hash").map_err(column_error)?,
        row.try_get("token").map_err(column_error)?,
        UserId::from_uuid(user_id),
        created_at,
        updated_at,
        last_login_at,
    ))
}
