//! Service wiring: store selection plus the login and user-directory
//! operations used by the route handlers.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use wicket_auth::{
    HashCost, HashError, Hs256TokenService, Identity, Role, SignError, TokenValidator,
    hash_password, verify_password,
};
use wicket_core::{DomainError, UserId};
use wicket_infra::{
    InMemoryUserStore, NewUser, PostgresUserStore, StoreError, UserChanges, UserRecord, UserStore,
};

use crate::app::dto::{self, RegisterUserRequest, UpdateUserRequest};
use crate::config::Config;

/// Login failures. The first two are expected outcomes (401); the rest are
/// internal faults (500, fatal to the request only).
#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown username or wrong password, deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Credentials verified but the account is deactivated.
    #[error("account is deactivated")]
    Inactive,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Sign(#[from] SignError),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

pub struct AppServices {
    users: Arc<dyn UserStore>,
    tokens: Arc<Hs256TokenService>,
    token_ttl: Duration,
    hash_cost: HashCost,
    started_at: Instant,
}

impl AppServices {
    /// Wire up stores and services from configuration. Uses the in-memory
    /// store unless persistent stores are requested.
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let users: Arc<dyn UserStore> = if config.use_persistent_stores {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            let pool = PgPool::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresUserStore::new(pool);
            store.migrate().await.context("failed to apply schema")?;
            Arc::new(store)
        } else {
            Arc::new(InMemoryUserStore::new())
        };

        Ok(Self {
            users,
            tokens: Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes())),
            token_ttl: config.token_ttl,
            hash_cost: config.hash_cost,
            started_at: Instant::now(),
        })
    }

    /// Validator handle for the guard middleware.
    pub fn token_validator(&self) -> Arc<dyn TokenValidator> {
        self.tokens.clone()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    // ------------------------------------------------------------------
    // Login flow: verify credentials, then mint a token
    // ------------------------------------------------------------------

    /// Verify `username`/`password` against the stored credential record and
    /// issue a token. One read query; no writes; the plaintext is never
    /// logged.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, LoginError> {
        let record = self.users.find_by_username(username).await?;

        // Lookup miss collapses into the same failure as a wrong password so
        // usernames cannot be enumerated through this endpoint.
        let Some(record) = record else {
            return Err(LoginError::InvalidCredentials);
        };

        if !record.is_active {
            return Err(LoginError::Inactive);
        }

        if !verify_password(password, &record.password_hash)? {
            return Err(LoginError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: record.id,
            username: record.username,
            role_id: Some(record.role_id),
        };
        Ok(self.tokens.issue(&identity, Utc::now(), self.token_ttl)?)
    }

    // ------------------------------------------------------------------
    // User directory
    // ------------------------------------------------------------------

    pub async fn register(&self, req: RegisterUserRequest) -> Result<UserRecord, ServiceError> {
        dto::validate_registration(&req)?;

        let role_id = req.role_id.unwrap_or(Role::SubAdmin.id());
        let password_hash = hash_password(&req.password, self.hash_cost)?;

        Ok(self
            .users
            .insert(NewUser {
                id: UserId::new(),
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                contact: req.contact,
                password_hash,
                is_active: req.is_active.unwrap_or(true),
                role_id,
            })
            .await?)
    }

    pub async fn get_user(&self, username: &str) -> Result<UserRecord, ServiceError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    /// Directory lookup with the admin-privacy rule: admins are not
    /// inspectable through this path, only sub-admins are.
    pub async fn get_sub_admin(&self, username: &str) -> Result<UserRecord, ServiceError> {
        let record = self.get_user(username).await?;
        if record.role_id == Role::Admin.id() {
            return Err(ServiceError::Domain(DomainError::Unauthorized));
        }
        Ok(record)
    }

    pub async fn list_sub_admins(&self) -> Result<Vec<UserRecord>, ServiceError> {
        Ok(self.users.list_by_role(Role::SubAdmin.id()).await?)
    }

    /// Partial update; a new password is re-hashed before storage. Role and
    /// deletion state are not reachable from here.
    pub async fn update_user(
        &self,
        username: &str,
        req: UpdateUserRequest,
    ) -> Result<UserRecord, ServiceError> {
        dto::validate_update(&req)?;

        let mut changes = UserChanges {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            contact: req.contact,
            is_active: req.is_active,
            ..UserChanges::default()
        };
        if let Some(password) = req.password {
            changes.password_hash = Some(hash_password(&password, self.hash_cost)?);
        }

        self.users
            .update(username, changes)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    pub async fn set_active(&self, username: &str, active: bool) -> Result<UserRecord, ServiceError> {
        self.users
            .update(
                username,
                UserChanges {
                    is_active: Some(active),
                    ..UserChanges::default()
                },
            )
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    /// Soft delete: the record is retained but disappears from every lookup,
    /// including credential verification.
    pub async fn delete_user(&self, username: &str) -> Result<(), ServiceError> {
        let record = self.get_user(username).await?;
        if !self.users.soft_delete(record.id).await? {
            return Err(ServiceError::Domain(DomainError::NotFound));
        }
        Ok(())
    }
}
