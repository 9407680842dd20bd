use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use wicket_core::UserId;

use super::{NewUser, StoreError, UserChanges, UserRecord, UserStore};

/// In-memory user store for dev/test.
///
/// Enforces the same live-row uniqueness semantics as the Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<UserId, UserRecord>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<UserId, UserRecord>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn is_live(record: &UserRecord) -> bool {
    record.deleted_at.is_none()
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .read()
            .values()
            .find(|u| is_live(u) && u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .read()
            .values()
            .find(|u| is_live(u) && u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut map = self.write();

        if map.values().any(|u| is_live(u) && u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }
        if map.values().any(|u| is_live(u) && u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let record = UserRecord {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            contact: user.contact,
            password_hash: user.password_hash,
            is_active: user.is_active,
            role_id: user.role_id,
            created_at: Utc::now(),
            deleted_at: None,
        };
        map.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        username: &str,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut map = self.write();

        if let Some(email) = &changes.email {
            if map
                .values()
                .any(|u| is_live(u) && u.username != username && &u.email == email)
            {
                return Err(StoreError::Duplicate("email"));
            }
        }

        let Some(record) = map
            .values_mut()
            .find(|u| is_live(u) && u.username == username)
        else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(contact) = changes.contact {
            record.contact = Some(contact);
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        if let Some(is_active) = changes.is_active {
            record.is_active = is_active;
        }

        Ok(Some(record.clone()))
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, StoreError> {
        let mut map = self.write();
        match map.get_mut(&id) {
            Some(record) if is_live(record) => {
                record.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_role(&self, role_id: i16) -> Result<Vec<UserRecord>, StoreError> {
        let mut users: Vec<UserRecord> = self
            .read()
            .values()
            .filter(|u| is_live(u) && u.role_id == role_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| (a.created_at, &a.username).cmp(&(b.created_at, &b.username)));
        Ok(users)
    }
}
