//! Postgres-backed user store.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use wicket_core::UserId;

use super::{NewUser, StoreError, UserChanges, UserRecord, UserStore};

/// Postgres-backed user store.
///
/// ## Uniqueness
///
/// Username and email are enforced by partial unique indexes over live rows,
/// so a soft-deleted username or email can be registered again.
///
/// ## Soft deletes
///
/// Every query filters on `deleted_at IS NULL`; deleted rows are retained but
/// unreachable through this interface.
pub struct PostgresUserStore {
    pool: PgPool,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username VARCHAR(20) NOT NULL,
    email TEXT NOT NULL,
    first_name VARCHAR(20) NOT NULL,
    last_name VARCHAR(20) NOT NULL,
    contact VARCHAR(13),
    password_hash TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    role_id SMALLINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at TIMESTAMPTZ
);
CREATE UNIQUE INDEX IF NOT EXISTS users_username_live_key
    ON users (username) WHERE deleted_at IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS users_email_live_key
    ON users (email) WHERE deleted_at IS NULL
"#;

const COLUMNS: &str = "id, username, email, first_name, last_name, contact, \
                       password_hash, is_active, role_id, created_at, deleted_at";

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table and its live-row unique indexes if missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        tracing::debug!("applying user store schema");
        for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn record_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get("id")?),
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        contact: row.try_get("contact")?,
        password_hash: row.try_get("password_hash")?,
        is_active: row.try_get("is_active")?,
        role_id: row.try_get("role_id")?,
        created_at: row.try_get("created_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_live_key") => "email",
                _ => "username",
            };
            return StoreError::Duplicate(field);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users \
             (id, username, email, first_name, last_name, contact, password_hash, is_active, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.contact)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(record_from_row(&row)?)
    }

    async fn update(
        &self,
        username: &str,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             email = COALESCE($4, email), \
             contact = COALESCE($5, contact), \
             password_hash = COALESCE($6, password_hash), \
             is_active = COALESCE($7, is_active) \
             WHERE username = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(username)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.contact)
        .bind(&changes.password_hash)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_role(&self, role_id: i16) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users \
             WHERE role_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at, username"
        ))
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| record_from_row(row).map_err(StoreError::from))
            .collect()
    }
}
