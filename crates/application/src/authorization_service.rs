use std::sync::Arc;

use warden_core::{AppError, AppResult, UserId};
use warden_domain::{Permission, PermissionId, Role, RoleId};

use crate::rbac_ports::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};

mod assignments;
mod bootstrap;
mod checks;
mod permissions;
mod roles;

pub use bootstrap::BootstrapReport;

/// Administrative payload for a new non-system role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Unique role name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
}

/// Administrative payload for a new non-system permission.
///
/// The permission name is derived from the key as `resource:action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDraft {
    /// Resource group.
    pub resource: String,
    /// Action on the resource.
    pub action: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
}

/// Role-based authorization engine.
///
/// Composes the role, permission and assignment stores. Every check goes
/// to the store; nothing is cached between calls.
#[derive(Clone)]
pub struct AuthorizationService {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
    role_permissions: Arc<dyn RolePermissionRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from store implementations.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
        role_permissions: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            roles,
            permissions,
            user_roles,
            role_permissions,
        }
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.roles
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn require_permission_row(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.permissions
            .find_permission_by_id(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }
}

fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }

    Ok(trimmed.to_owned())
}
