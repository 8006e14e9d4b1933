use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{AppError, AppResult, UserId};
use warden_domain::TokenKind;

/// Token type advertised alongside issued pairs.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Claims carried by every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Numeric user id.
    pub user_id: UserId,
    /// Username at issuance time.
    pub username: String,
    /// Email at issuance time.
    pub email: String,
    /// Access or refresh.
    pub kind: TokenKind,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Not-before, seconds since the epoch.
    pub nbf: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Subject in `user_{id}` form.
    pub sub: String,
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: DateTime<Utc>,
    /// Always [`BEARER_TOKEN_TYPE`].
    pub token_type: String,
}

/// Reasons a token can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// `exp` is at or before the current time.
    #[error("token expired")]
    Expired,

    /// Signature, algorithm, encoding or not-before check failed.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Claims could not be decoded into the expected shape.
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Token kind differs from the one the caller accepts.
    #[error("invalid token type: expected {expected}, got {actual}")]
    WrongKind {
        /// Kind the caller accepts.
        expected: TokenKind,
        /// Kind carried by the token.
        actual: TokenKind,
    },

    /// Signing failed while issuing.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Client-facing message for a rejected token.
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Expired => "Token has expired",
            Self::Invalid(_) => "Invalid token",
            Self::InvalidClaims(_) => "Invalid token claims",
            Self::WrongKind { .. } => "Invalid token type",
            Self::Signing(_) => "Failed to issue token",
        }
    }
}

impl From<TokenError> for AppError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(message) => {
                AppError::Internal(format!("failed to sign token: {message}"))
            }
            other => AppError::Unauthorized(other.client_message().to_owned()),
        }
    }
}

/// Input for issuing a token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Numeric user id.
    pub user_id: UserId,
    /// Username embedded in claims.
    pub username: String,
    /// Email embedded in claims.
    pub email: String,
}

/// Signs, validates and refreshes bearer tokens.
pub trait TokenManager: Send + Sync {
    /// Issues an access and refresh pair for the subject.
    fn issue(&self, subject: &TokenSubject) -> Result<TokenPair, TokenError>;

    /// Validates a token and requires it to be of `expected` kind.
    fn validate(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError>;

    /// Validates a refresh token and issues a new pair with the same identity.
    fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError>;
}

/// Short, non-reversible marker for logging a token without leaking it.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}…")
}

/// Converts a token result into the crate-wide result type.
pub fn into_app_result<T>(result: Result<T, TokenError>) -> AppResult<T> {
    result.map_err(AppError::from)
}
