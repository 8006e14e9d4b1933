use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use warden_application::{TokenClaims, TokenError, TokenManager, token_fingerprint};
use warden_core::AuthenticatedUser;
use warden_domain::TokenKind;

use crate::error::error_response;
use crate::state::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Reason a request failed bearer authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization` header was sent.
    MissingHeader,
    /// The header is not `Bearer <token>` with exactly one token.
    MalformedHeader,
    /// The scheme is present but the token is empty.
    EmptyToken,
    /// The token failed validation or was not an access token.
    Token(TokenError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (error, message) = match self {
            Self::MissingHeader => ("Unauthorized", "Missing authorization header"),
            Self::MalformedHeader => ("Unauthorized", "Invalid authorization header format"),
            Self::EmptyToken => ("Unauthorized", "Empty token"),
            Self::Token(TokenError::Expired) => (
                "Token expired",
                "Your session has expired, please login again",
            ),
            Self::Token(TokenError::Invalid(_)) => {
                ("Invalid token", "Invalid authentication token")
            }
            Self::Token(TokenError::InvalidClaims(_)) => {
                ("Invalid token claims", "Invalid token claims")
            }
            Self::Token(TokenError::WrongKind { .. }) => {
                ("Invalid token type", "An access token is required")
            }
            Self::Token(TokenError::Signing(_)) => {
                ("Authentication failed", "Token validation failed")
            }
        };

        error_response(StatusCode::UNAUTHORIZED, error, message)
    }
}

/// Rejects requests without a valid access token and binds the identity otherwise.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let claims = authenticate(state.token_manager.as_ref(), request.headers())?;
    debug!(
        user_id = %claims.user_id,
        username = %claims.username,
        "request authenticated"
    );

    bind_identity(&mut request, claims);
    Ok(next.run(request).await)
}

/// Binds the identity when a valid access token is present and never rejects.
pub async fn optional_bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(claims) = authenticate(state.token_manager.as_ref(), request.headers()) {
        bind_identity(&mut request, claims);
    }

    next.run(request).await
}

pub(crate) fn authenticate(
    token_manager: &dyn TokenManager,
    headers: &HeaderMap,
) -> Result<TokenClaims, AuthRejection> {
    let token = bearer_token(headers).inspect_err(|rejection| {
        debug!(?rejection, "bearer authentication rejected");
    })?;

    token_manager
        .validate(token, TokenKind::Access)
        .map_err(|error| {
            debug!(
                %error,
                token = %token_fingerprint(token),
                "bearer token validation failed"
            );
            AuthRejection::Token(error)
        })
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingHeader)?
        .to_str()
        .map_err(|_| AuthRejection::MalformedHeader)?;

    if value.is_empty() {
        return Err(AuthRejection::MissingHeader);
    }

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthRejection::MalformedHeader)?;
    if scheme != BEARER_SCHEME || token.contains(' ') {
        return Err(AuthRejection::MalformedHeader);
    }
    if token.is_empty() {
        return Err(AuthRejection::EmptyToken);
    }

    Ok(token)
}

fn bind_identity(request: &mut Request, claims: TokenClaims) {
    let user = AuthenticatedUser::new(
        claims.user_id,
        claims.username.as_str(),
        claims.email.as_str(),
    );

    let extensions = request.extensions_mut();
    extensions.insert(user);
    extensions.insert(claims);
}
