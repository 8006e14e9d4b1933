//! Account ports and the registration, login and refresh flows.
//!
//! Identity rows are owned by an external store; this service only
//! consumes them through [`IdentityRepository`]. Failure messages for
//! credential checks are generic so callers cannot enumerate usernames.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use warden_core::{AppError, AppResult, UserId};
use warden_domain::UserStatus;

use crate::AuthorizationService;
use crate::token_ports::{TokenManager, TokenPair, TokenSubject, into_app_result};

mod login;
mod registration;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Identity row returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Numeric user id.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique lowercase email.
    pub email: String,
    /// Encoded Argon2id hash.
    pub password_hash: String,
    /// Account status.
    pub status: UserStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Token subject derived from this identity.
    #[must_use]
    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject {
            user_id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Row payload for inserting an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    /// Validated username.
    pub username: String,
    /// Validated lowercase email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Initial status.
    pub status: UserStatus,
}

/// Repository port for identity lookups.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Finds an identity by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<IdentityRecord>>;

    /// Finds an identity by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<IdentityRecord>>;

    /// Returns whether the username is taken.
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Returns whether the email is taken.
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Inserts an identity. Fails with `Conflict` on a duplicate username or email.
    async fn create(&self, identity: NewIdentity) -> AppResult<IdentityRecord>;

    /// Removes an identity. Deleting a missing id is not an error.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing. Implementations are CPU bound and are
/// called from a blocking thread.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh random salt.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against an encoded hash in constant time.
    fn verify_password(&self, password: &str, encoded_hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Authenticated identity.
    pub identity: IdentityRecord,
    /// Freshly issued token pair.
    pub tokens: TokenPair,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for account registration and authentication.
#[derive(Clone)]
pub struct AccountService {
    identities: Arc<dyn IdentityRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_manager: Arc<dyn TokenManager>,
    authorization: AuthorizationService,
    hash_permits: Arc<Semaphore>,
}

impl AccountService {
    /// Creates a new account service.
    ///
    /// At most `hash_concurrency` hash or verify operations run at once;
    /// zero is treated as one.
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        authorization: AuthorizationService,
        hash_concurrency: usize,
    ) -> Self {
        Self {
            identities,
            password_hasher,
            token_manager,
            authorization,
            hash_permits: Arc::new(Semaphore::new(hash_concurrency.max(1))),
        }
    }

    /// Rotates a refresh token into a new pair.
    pub fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        into_app_result(self.token_manager.refresh(refresh_token))
    }

    /// Loads the identity behind an authenticated request.
    pub async fn current_user(&self, user_id: UserId) -> AppResult<IdentityRecord> {
        self.identities
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    async fn hash_bounded(&self, password: &str) -> AppResult<String> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        self.run_bounded(move || hasher.hash_password(&password))
            .await
    }

    async fn verify_bounded(&self, password: &str, encoded_hash: &str) -> AppResult<bool> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let encoded_hash = encoded_hash.to_owned();
        self.run_bounded(move || hasher.verify_password(&password, &encoded_hash))
            .await
    }

    async fn run_bounded<T, F>(&self, work: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> AppResult<T> + Send + 'static,
    {
        let _permit = self
            .hash_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|error| AppError::Internal(format!("hash pool closed: {error}")))?;

        tokio::task::spawn_blocking(work)
            .await
            .map_err(|error| AppError::Internal(format!("hash task failed: {error}")))?
    }
}
