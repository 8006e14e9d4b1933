//! Argon2id password hasher implementation.
//!
//! Hashes are stored in PHC string form:
//! `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt>$<hash>`.
//! Verification re-derives with the parameters recorded in the string.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use warden_application::PasswordHasher as PasswordHasherPort;
use warden_core::{AppError, AppResult};

const PHC_FIELD_COUNT: usize = 6;
const PHC_VERSION_FIELD: &str = "v=19";

/// Cost parameters for newly created hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
    /// Derived key length in bytes.
    pub key_length: usize,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 2,
            key_length: 32,
        }
    }
}

/// Argon2id password hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher, rejecting parameters Argon2 cannot run with.
    pub fn new(config: PasswordHashConfig) -> AppResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(config.key_length),
        )
        .map_err(|error| AppError::Validation(format!("invalid argon2 parameters: {error}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

fn parse_encoded_hash(encoded_hash: &str) -> AppResult<PasswordHash<'_>> {
    let fields: Vec<&str> = encoded_hash.split('$').collect();
    if fields.len() != PHC_FIELD_COUNT {
        return Err(AppError::Validation(format!(
            "failed to decode password hash: expected {PHC_FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }
    if fields[2] != PHC_VERSION_FIELD {
        return Err(AppError::Validation(format!(
            "failed to decode password hash: unsupported version '{}'",
            fields[2]
        )));
    }

    PasswordHash::new(encoded_hash)
        .map_err(|error| AppError::Validation(format!("failed to decode password hash: {error}")))
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))?;

        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, encoded_hash: &str) -> AppResult<bool> {
        let parsed_hash = parse_encoded_hash(encoded_hash)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}
