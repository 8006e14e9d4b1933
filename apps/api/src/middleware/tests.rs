use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::Duration;
use warden_application::{AuthorizationService, RolePermissionRepository, TokenError};
use warden_core::{AppError, AppResult, AuthenticatedUser, UserId};
use warden_domain::{Permission, PermissionId, RoleId, RolePermissionAssignment};
use warden_infrastructure::InMemoryRbacRepository;

use super::bearer::{AuthRejection, bearer_token};
use super::{AccessGuard, AccessRequirement, require_access};
use crate::test_support::{TestApp, bearer, request, send};

struct OfflineRolePermissions;

fn offline<T>() -> AppResult<T> {
    Err(AppError::Internal("role permission store offline".to_owned()))
}

#[async_trait]
impl RolePermissionRepository for OfflineRolePermissions {
    async fn assign_permission(
        &self,
        _role_id: RoleId,
        _permission_id: PermissionId,
        _assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment> {
        offline()
    }

    async fn remove_permission(
        &self,
        _role_id: RoleId,
        _permission_id: PermissionId,
    ) -> AppResult<()> {
        offline()
    }

    async fn list_role_permissions(&self, _role_id: RoleId) -> AppResult<Vec<Permission>> {
        offline()
    }

    async fn role_has_permission(
        &self,
        _role_id: RoleId,
        _permission_id: PermissionId,
    ) -> AppResult<bool> {
        offline()
    }

    async fn list_user_permissions(&self, _user_id: UserId) -> AppResult<Vec<Permission>> {
        offline()
    }

    async fn user_has_permission(
        &self,
        _user_id: UserId,
        _resource: &str,
        _action: &str,
    ) -> AppResult<bool> {
        offline()
    }
}

fn guarded_router(
    authorization_service: AuthorizationService,
    requirement: AccessRequirement,
    user: Option<AuthenticatedUser>,
) -> Router {
    let router = Router::new().route(
        "/guarded",
        get(|| async { "ok" }).route_layer(from_fn_with_state(
            AccessGuard::new(authorization_service, requirement),
            require_access,
        )),
    );

    match user {
        Some(user) => router.layer(axum::Extension(user)),
        None => router,
    }
}

fn authorization_header(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
    headers
}

#[test]
fn bearer_token_requires_exact_scheme() {
    assert_eq!(
        bearer_token(&HeaderMap::new()),
        Err(AuthRejection::MissingHeader)
    );
    assert_eq!(
        bearer_token(&authorization_header("bearer abc")),
        Err(AuthRejection::MalformedHeader)
    );
    assert_eq!(
        bearer_token(&authorization_header("Bearer a b")),
        Err(AuthRejection::MalformedHeader)
    );
    assert_eq!(
        bearer_token(&authorization_header("Basic dXNlcjpwdw==")),
        Err(AuthRejection::MalformedHeader)
    );
    assert_eq!(
        bearer_token(&authorization_header("Bearer ")),
        Err(AuthRejection::EmptyToken)
    );
    assert_eq!(bearer_token(&authorization_header("Bearer abc")), Ok("abc"));
}

#[tokio::test]
async fn rejections_carry_distinct_titles() {
    let cases = [
        (AuthRejection::Token(TokenError::Expired), "Token expired"),
        (
            AuthRejection::Token(TokenError::Invalid("bad signature".to_owned())),
            "Invalid token",
        ),
        (
            AuthRejection::Token(TokenError::InvalidClaims("missing exp".to_owned())),
            "Invalid token claims",
        ),
        (AuthRejection::EmptyToken, "Unauthorized"),
    ];

    for (rejection, expected_title) in cases {
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap_or_default();
        assert_eq!(body["code"], 401);
        assert_eq!(body["error"], expected_title);
    }
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = send(app.router(), request("GET", "/api/auth/me", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn malformed_scheme_and_empty_token_are_rejected_separately() {
    let app = TestApp::new().await;

    let (_, malformed) = send(
        app.router(),
        request("GET", "/api/auth/me", Some("Token abc"), None),
    )
    .await;
    let (_, empty) = send(
        app.router(),
        request("GET", "/api/auth/me", Some("Bearer "), None),
    )
    .await;

    assert_eq!(malformed["message"], "Invalid authorization header format");
    assert_eq!(empty["message"], "Empty token");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let app = TestApp::new().await;

    let (status, body) = send(
        app.router(),
        request("GET", "/api/auth/me", Some("Bearer not.a.jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn access_token_expires_after_its_ttl() {
    let app = TestApp::new().await;
    let identity = app.register("alice").await;
    let tokens = app.tokens_for(&identity);
    let authorization = bearer(tokens.access_token.as_str());

    app.clock.advance(Duration::minutes(14));
    let (fresh_status, fresh_body) = send(
        app.router(),
        request("GET", "/api/auth/me", Some(authorization.as_str()), None),
    )
    .await;

    app.clock.advance(Duration::minutes(2));
    let (stale_status, stale_body) = send(
        app.router(),
        request("GET", "/api/auth/me", Some(authorization.as_str()), None),
    )
    .await;

    assert_eq!(fresh_status, StatusCode::OK);
    assert_eq!(fresh_body["username"], "alice");
    assert_eq!(stale_status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale_body["error"], "Token expired");
}

#[tokio::test]
async fn refresh_token_is_not_accepted_as_bearer() {
    let app = TestApp::new().await;
    let identity = app.register("bob").await;
    let tokens = app.tokens_for(&identity);
    let authorization = bearer(tokens.refresh_token.as_str());

    let (status, body) = send(
        app.router(),
        request("GET", "/api/auth/me", Some(authorization.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token type");
}

#[tokio::test]
async fn optional_auth_proceeds_without_identity_on_bad_token() {
    let app = TestApp::new().await;

    let (status, body) = send(
        app.router(),
        request("GET", "/api/health", Some("Bearer broken"), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body["user_id"].is_null());
}

#[tokio::test]
async fn optional_auth_binds_identity_on_valid_token() {
    let app = TestApp::new().await;
    let identity = app.register("carol").await;
    let tokens = app.tokens_for(&identity);
    let authorization = bearer(tokens.access_token.as_str());

    let (status, body) = send(
        app.router(),
        request("GET", "/api/health", Some(authorization.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user_id"], identity.id.as_i64());
}

#[tokio::test]
async fn guard_without_identity_is_unauthorized() {
    let app = TestApp::new().await;
    let router = guarded_router(
        app.state.authorization_service.clone(),
        AccessRequirement::permission("user", "read"),
        None,
    );

    let (status, body) = send(router, request("GET", "/guarded", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn guard_checks_permission_through_roles() {
    let app = TestApp::new().await;
    let identity = app.register("dave").await;
    let user = AuthenticatedUser::new(identity.id, "dave", "dave@example.com");

    let allowed = guarded_router(
        app.state.authorization_service.clone(),
        AccessRequirement::permission("user", "read"),
        Some(user.clone()),
    );
    let denied = guarded_router(
        app.state.authorization_service.clone(),
        AccessRequirement::permission("user", "manage"),
        Some(user),
    );

    let (allowed_status, _) = send(allowed, request("GET", "/guarded", None, None)).await;
    let (denied_status, denied_body) = send(denied, request("GET", "/guarded", None, None)).await;

    assert_eq!(allowed_status, StatusCode::OK);
    assert_eq!(denied_status, StatusCode::FORBIDDEN);
    assert_eq!(denied_body["message"], "Insufficient permissions");
}

#[tokio::test]
async fn guard_checks_roles_and_admin_shorthand() {
    let app = TestApp::new().await;
    let identity = app.register("erin").await;
    let user = AuthenticatedUser::new(identity.id, "erin", "erin@example.com");

    let by_role = guarded_router(
        app.state.authorization_service.clone(),
        AccessRequirement::Role("user"),
        Some(user.clone()),
    );
    let admin_only = guarded_router(
        app.state.authorization_service.clone(),
        AccessRequirement::admin(),
        Some(user),
    );

    let (role_status, _) = send(by_role, request("GET", "/guarded", None, None)).await;
    let (admin_status, admin_body) =
        send(admin_only, request("GET", "/guarded", None, None)).await;

    assert_eq!(role_status, StatusCode::OK);
    assert_eq!(admin_status, StatusCode::FORBIDDEN);
    assert_eq!(admin_body["message"], "Administrator privileges required");
}

#[tokio::test]
async fn guard_reports_store_failure_as_internal_error() {
    let rbac = Arc::new(InMemoryRbacRepository::new());
    let authorization_service = AuthorizationService::new(
        rbac.clone(),
        rbac.clone(),
        rbac,
        Arc::new(OfflineRolePermissions),
    );
    let user = AuthenticatedUser::new(UserId::new(7), "frank", "frank@example.com");
    let router = guarded_router(
        authorization_service,
        AccessRequirement::permission("role", "read"),
        Some(user),
    );

    let (status, body) = send(router, request("GET", "/guarded", None, None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to verify permissions");
}
