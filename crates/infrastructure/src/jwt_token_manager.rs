//! HS256 bearer token manager.
//!
//! Expiry and not-before are checked against an injected [`Clock`] rather
//! than the library's wall-clock validation, so a token lives for exactly
//! its TTL: valid while `now < exp`, expired from `exp` onward.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use warden_application::{
    BEARER_TOKEN_TYPE, Clock, TokenClaims, TokenError, TokenManager, TokenPair, TokenSubject,
    token_fingerprint,
};
use warden_core::{AppError, AppResult};
use warden_domain::TokenKind;

/// Minimum accepted length of the signing secret.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signing and lifetime configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric HMAC secret.
    pub secret: String,
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
    /// Value of the `iss` claim.
    pub issuer: String,
}

impl Debug for TokenConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Stateless token manager signing with HMAC-SHA256.
#[derive(Clone)]
pub struct JwtTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl JwtTokenManager {
    /// Creates a manager, rejecting short secrets and non-positive lifetimes.
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if config.secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "token secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if config.access_ttl <= Duration::zero() || config.refresh_ttl <= Duration::zero() {
            return Err(AppError::Validation(
                "token lifetimes must be positive".to_owned(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            issuer: config.issuer,
            clock,
        })
    }

    fn sign(&self, subject: &TokenSubject, kind: TokenKind) -> Result<(String, i64), TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let issued_at = self.clock.now();
        let expires_at = issued_at + ttl;

        let claims = TokenClaims {
            user_id: subject.user_id,
            username: subject.username.clone(),
            email: subject.email.clone(),
            kind,
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            sub: subject.user_id.subject(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| TokenError::Signing(error.to_string()))?;

        Ok((token, claims.exp))
    }
}

fn map_decode_error(error: &jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::InvalidClaims(error.to_string())
        }
        _ => TokenError::Invalid(error.to_string()),
    }
}

impl TokenManager for JwtTokenManager {
    fn issue(&self, subject: &TokenSubject) -> Result<TokenPair, TokenError> {
        let (access_token, access_exp) = self.sign(subject, TokenKind::Access)?;
        let (refresh_token, _) = self.sign(subject, TokenKind::Refresh)?;

        let expires_at = chrono::DateTime::from_timestamp(access_exp, 0)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_owned()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_at,
            token_type: BEARER_TOKEN_TYPE.to_owned(),
        })
    }

    fn validate(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| {
                debug!(token = %token_fingerprint(token), %error, "token failed to decode");
                map_decode_error(&error)
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if now < claims.nbf {
            return Err(TokenError::Invalid("token is not valid yet".to_owned()));
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.sub != claims.user_id.subject() {
            return Err(TokenError::InvalidClaims(
                "subject does not match user id".to_owned(),
            ));
        }
        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }

        Ok(claims)
    }

    fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self.validate(refresh_token, TokenKind::Refresh)?;

        self.issue(&TokenSubject {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
        })
    }
}
