//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserProfile, UserRepository};
use crate::domain::{DomainError, EntityKind};

const USER_COLUMNS: &str = "id, first_name, last_name, address1, address2, zip_code, email, \
                            created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn search(&self, query: &UserProfile) -> Result<Option<User>, DomainError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE first_name = $1
              AND last_name = $2
              AND address1 = $3
              AND address2 IS NOT DISTINCT FROM $4
              AND zip_code = $5
              AND LOWER(email) = LOWER($6)
            LIMIT 1
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&query.first_name)
            .bind(&query.last_name)
            .bind(&query.address1)
            .bind(query.address2.as_deref())
            .bind(&query.zip_code)
            .bind(&query.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to search users: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, address1, address2, zip_code,
                               email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.address1())
        .bind(user.address2())
        .bind(user.zip_code())
        .bind(user.email())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(
                    EntityKind::User,
                    "A user with this profile is already registered",
                )
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, address1 = $4, address2 = $5,
                zip_code = $6, email = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.address1())
        .bind(user.address2())
        .bind(user.zip_code())
        .bind(user.email())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(
                    EntityKind::User,
                    "Another user already has this profile",
                )
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                EntityKind::User,
                format!("User '{}' not found", user.id()),
            ));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Whether a sqlx error is a unique-constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Failed to read user row: {}", e));

    let id: Uuid = row.try_get("id").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    let profile = UserProfile {
        first_name: row.try_get("first_name").map_err(column_error)?,
        last_name: row.try_get("last_name").map_err(column_error)?,
        address1: row.try_get("address1").map_err(column_error)?,
        address2: row.try_get("address2").map_err(column_error)?,
        zip_code: row.try_get("zip_code").map_err(column_error)?,
        email: row.try_get("email").map_err(column_error)?,
    };

    Ok(User::from_parts(
        UserId::from_uuid(id),
        profile,
        created_at,
        updated_at,
    ))
}
