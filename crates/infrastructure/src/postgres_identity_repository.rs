//! PostgreSQL-backed identity repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use warden_application::{IdentityRecord, IdentityRepository, NewIdentity};
use warden_core::{AppError, AppResult, UserId};
use warden_domain::UserStatus;

/// PostgreSQL implementation of the identity repository port.
#[derive(Clone)]
pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for IdentityRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let status = UserStatus::from_str(&row.status).map_err(|error| {
            AppError::Internal(format!("user '{}' has invalid status: {error}", row.id))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<IdentityRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(IdentityRecord::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<IdentityRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, status, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user by username: {error}"))
        })?;

        row.map(IdentityRecord::try_from).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check username: {error}")))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check email: {error}")))
    }

    async fn create(&self, identity: NewIdentity) -> AppResult<IdentityRecord> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, status, created_at, updated_at
            "#,
        )
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.password_hash.as_str())
        .bind(identity.status.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => IdentityRecord::try_from(row),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "user '{}' or email '{}' already exists",
                        identity.username, identity.email
                    )));
                }

                Err(AppError::Internal(format!("failed to create user: {error}")))
            }
        }
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}
