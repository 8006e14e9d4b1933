//! Identity-side domain types and registration input rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult};

/// Minimum accepted username length.
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum accepted username length.
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum accepted password length (bounds Argon2 input size).
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Lifecycle status of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// The account can authenticate.
    Active,
    /// The account exists but has been deactivated.
    Inactive,
    /// The account has been banned by an administrator.
    Banned,
}

impl UserStatus {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "banned" => Ok(Self::Banned),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username: trimmed, 3 to 50 characters, no whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let char_count = trimmed.chars().count();

        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&char_count) {
            return Err(AppError::Validation(format!(
                "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "username must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@' and a local part".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 100 {
            return Err(AppError::Validation(
                "email address must not exceed 100 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validates a plaintext password length before it reaches the hasher.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_accepted() {
        let email = EmailAddress::new("USER@Example.COM");
        assert!(email.is_ok());
        assert_eq!(
            email.unwrap_or_else(|_| panic!("test")).as_str(),
            "user@example.com"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
        assert!(EmailAddress::new("a@b@example.com").is_err());
    }

    #[test]
    fn username_length_is_enforced() {
        assert!(Username::new("ab").is_err());
        assert!(Username::new("alice").is_ok());
        assert!(Username::new("al ice").is_err());
    }

    #[test]
    fn password_bounds_are_enforced() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password(&"x".repeat(101)).is_err());
    }

    #[test]
    fn user_status_roundtrips_storage_value() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Banned] {
            let parsed = UserStatus::from_str(status.as_str());
            assert!(matches!(parsed, Ok(value) if value == status));
        }
        assert!(UserStatus::from_str("deleted").is_err());
    }
}
