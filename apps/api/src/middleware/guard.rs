use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error};
use warden_application::AuthorizationService;
use warden_core::{AppResult, AuthenticatedUser};
use warden_domain::SystemRole;

use crate::error::error_response;

/// What a guarded route demands from the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequirement {
    /// The caller must hold `resource:action` through one of their roles.
    Permission {
        /// Resource group, such as `role`.
        resource: &'static str,
        /// Action on the resource, such as `read`.
        action: &'static str,
    },
    /// The caller must hold the named role.
    Role(&'static str),
}

impl AccessRequirement {
    /// Requires the `resource:action` permission.
    pub fn permission(resource: &'static str, action: &'static str) -> Self {
        Self::Permission { resource, action }
    }

    /// Shorthand for the `admin` system role.
    pub fn admin() -> Self {
        Self::Role(SystemRole::Admin.as_str())
    }

    fn denial_message(&self) -> &'static str {
        match self {
            Self::Permission { .. } => "Insufficient permissions",
            Self::Role(name) if *name == SystemRole::Admin.as_str() => {
                "Administrator privileges required"
            }
            Self::Role(_) => "Required role not found",
        }
    }
}

/// Middleware state pairing the engine with one route's requirement.
#[derive(Clone)]
pub struct AccessGuard {
    authorization_service: AuthorizationService,
    requirement: AccessRequirement,
}

impl AccessGuard {
    pub fn new(authorization_service: AuthorizationService, requirement: AccessRequirement) -> Self {
        Self {
            authorization_service,
            requirement,
        }
    }

    async fn allows(&self, user: &AuthenticatedUser) -> AppResult<bool> {
        match &self.requirement {
            AccessRequirement::Permission { resource, action } => {
                self.authorization_service
                    .has_permission(user.user_id(), resource, action)
                    .await
            }
            AccessRequirement::Role(name) => {
                self.authorization_service
                    .has_role(user.user_id(), name)
                    .await
            }
        }
    }
}

/// Runs after bearer authentication; every request re-queries the engine.
pub async fn require_access(
    State(guard): State<AccessGuard>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>().cloned() else {
        debug!(requirement = ?guard.requirement, "access check without authenticated user");
        return error_response(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Authentication required",
        );
    };

    match guard.allows(&user).await {
        Ok(true) => {
            debug!(
                user_id = %user.user_id(),
                requirement = ?guard.requirement,
                "access check passed"
            );
            next.run(request).await
        }
        Ok(false) => {
            debug!(
                user_id = %user.user_id(),
                username = user.username(),
                requirement = ?guard.requirement,
                "access denied"
            );
            error_response(
                StatusCode::FORBIDDEN,
                "Forbidden",
                guard.requirement.denial_message(),
            )
        }
        Err(check_error) => {
            error!(
                user_id = %user.user_id(),
                requirement = ?guard.requirement,
                error = %check_error,
                "failed to verify access"
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "Failed to verify permissions",
            )
        }
    }
}
