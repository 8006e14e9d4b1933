use warden_domain::{RoleAssignment, RolePermissionAssignment};

use super::*;

impl AuthorizationService {
    /// Assigns a role to a user, recording the acting identity.
    ///
    /// The pre-check gives callers a clear error; the store insert is
    /// conditional on the unique pair and reports `Conflict` on its own.
    pub async fn assign_role_to_user(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: UserId,
    ) -> AppResult<RoleAssignment> {
        let role = self.require_role(role_id).await?;

        if self.user_roles.user_has_role(user_id, role_id).await? {
            return Err(AppError::Conflict(format!(
                "role '{}' is already assigned to '{}'",
                role.name,
                user_id.subject()
            )));
        }

        self.user_roles
            .assign_role(user_id, role_id, Some(assigned_by))
            .await
    }

    /// Removes a role from a user. Fails with `NotFound` if it was not assigned.
    pub async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self.user_roles.user_has_role(user_id, role_id).await? {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' is not assigned to '{}'",
                user_id.subject()
            )));
        }

        self.user_roles.remove_role(user_id, role_id).await
    }

    /// Lists the roles assigned to a user.
    pub async fn get_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.user_roles.list_user_roles(user_id).await
    }

    /// Lists raw assignment rows of a user.
    pub async fn get_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.user_roles.list_user_role_assignments(user_id).await
    }

    /// Lists the users holding a role.
    pub async fn get_role_users(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        self.require_role(role_id).await?;
        self.user_roles.list_role_users(role_id).await
    }

    /// Grants a permission to a role, recording the acting identity.
    pub async fn assign_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: UserId,
    ) -> AppResult<RolePermissionAssignment> {
        let role = self.require_role(role_id).await?;
        let permission = self.require_permission_row(permission_id).await?;

        if self
            .role_permissions
            .role_has_permission(role_id, permission_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' is already granted to role '{}'",
                permission.name, role.name
            )));
        }

        self.role_permissions
            .assign_permission(role_id, permission_id, Some(assigned_by))
            .await
    }

    /// Revokes a permission from a role. Fails with `NotFound` if it was not granted.
    pub async fn remove_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if !self
            .role_permissions
            .role_has_permission(role_id, permission_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' is not granted to role '{role_id}'"
            )));
        }

        self.role_permissions
            .remove_permission(role_id, permission_id)
            .await
    }

    /// Lists the permissions granted to a role.
    pub async fn get_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        self.require_role(role_id).await?;
        self.role_permissions.list_role_permissions(role_id).await
    }
}
