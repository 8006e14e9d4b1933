use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::{IdentityRecord, LoginOutcome, TokenPair};

/// Incoming payload for account registration.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Incoming payload for password login.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Incoming payload for token rotation.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/refresh-token-request.ts"
)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Issued access/refresh token pair.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/token-response.ts"
)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// RFC 3339 expiry of the access token.
    pub expires_at: String,
}

/// API representation of an account.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub status: String,
    pub created_at: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenResponse,
}

impl From<TokenPair> for TokenResponse {
    fn from(value: TokenPair) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            token_type: value.token_type,
            expires_at: value.expires_at.to_rfc3339(),
        }
    }
}

impl From<IdentityRecord> for UserResponse {
    fn from(value: IdentityRecord) -> Self {
        Self {
            id: value.id.as_i64(),
            username: value.username,
            email: value.email,
            status: value.status.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<LoginOutcome> for LoginResponse {
    fn from(value: LoginOutcome) -> Self {
        Self {
            user: UserResponse::from(value.identity),
            tokens: TokenResponse::from(value.tokens),
        }
    }
}
