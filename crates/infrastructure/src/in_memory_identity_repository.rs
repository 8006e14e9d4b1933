use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use warden_application::{IdentityRecord, IdentityRepository, NewIdentity};
use warden_core::{AppError, AppResult, UserId};
use warden_domain::UserStatus;

/// In-memory identity repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<BTreeMap<UserId, IdentityRecord>>,
}

impl InMemoryIdentityRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the status of an identity.
    pub async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<()> {
        let mut identities = self.identities.write().await;
        let identity = identities
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        identity.status = status;
        identity.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<IdentityRecord>> {
        Ok(self.identities.read().await.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<IdentityRecord>> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .find(|identity| identity.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let identities = self.identities.read().await;
        Ok(identities
            .values()
            .any(|identity| identity.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let identities = self.identities.read().await;
        Ok(identities.values().any(|identity| identity.email == email))
    }

    async fn create(&self, identity: NewIdentity) -> AppResult<IdentityRecord> {
        let mut identities = self.identities.write().await;
        if identities.values().any(|existing| {
            existing.username == identity.username || existing.email == identity.email
        }) {
            return Err(AppError::Conflict(format!(
                "user '{}' or email '{}' already exists",
                identity.username, identity.email
            )));
        }

        let next_id = identities
            .keys()
            .next_back()
            .map_or(1, |last| last.as_i64() + 1);
        let now = Utc::now();
        let record = IdentityRecord {
            id: UserId::new(next_id),
            username: identity.username,
            email: identity.email,
            password_hash: identity.password_hash,
            status: identity.status,
            created_at: now,
            updated_at: now,
        };
        identities.insert(record.id, record.clone());

        Ok(record)
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.identities.write().await.remove(&user_id);
        Ok(())
    }
}
