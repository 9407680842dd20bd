//! User directory storage abstraction.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use wicket_core::UserId;

/// Stored user record, including credential material.
///
/// This never crosses the HTTP boundary unprojected; the API layer maps it to
/// a safe view before responding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub role_id: i16,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Field values for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub contact: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub role_id: i16,
}

/// Partial update applied to an existing user.
///
/// Role and deletion timestamp are deliberately not updatable through this
/// path.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation on the named field.
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for the user directory.
///
/// Lookups observe live rows only: soft-deleted records are invisible to
/// every method, including credential verification. Username and email are
/// unique among live rows, so lookups have exactly-one-or-absent semantics.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Apply `changes` to the live row with `username`; `None` if absent.
    async fn update(
        &self,
        username: &str,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Mark the row deleted; returns whether a live row was affected.
    async fn soft_delete(&self, id: UserId) -> Result<bool, StoreError>;

    async fn list_by_role(&self, role_id: i16) -> Result<Vec<UserRecord>, StoreError>;
}
