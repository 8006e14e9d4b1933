use async_trait::async_trait;

use warden_core::{AppResult, UserId};
use warden_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RolePermissionAssignment,
};

use super::inputs::{
    CreatePermissionInput, CreateRoleInput, PageRequest, UpdatePermissionInput, UpdateRoleInput,
};

/// Storage capability for role rows.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts a role. Fails with `Conflict` when the name is taken.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role>;

    /// Finds a role by id.
    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Lists roles newest first.
    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<Role>>;

    /// Lists all system roles ordered by name.
    async fn list_system_roles(&self) -> AppResult<Vec<Role>>;

    /// Updates mutable fields. Fails with `NotFound` for unknown ids.
    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role>;

    /// Deletes a role and its assignments. Fails with `NotFound` for unknown ids.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Returns whether a role with this name exists.
    async fn role_exists_by_name(&self, name: &str) -> AppResult<bool>;
}

/// Storage capability for permission rows.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Inserts a permission. Fails with `Conflict` when the name or the
    /// `(resource, action)` pair is taken.
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission>;

    /// Finds a permission by id.
    async fn find_permission_by_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>>;

    /// Finds a permission by unique name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// Lists permissions newest first.
    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<Permission>>;

    /// Lists all system permissions ordered by name.
    async fn list_system_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists permissions of one resource group ordered by action.
    async fn list_permissions_by_resource(&self, resource: &str) -> AppResult<Vec<Permission>>;

    /// Updates mutable fields. Fails with `NotFound` for unknown ids.
    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission>;

    /// Deletes a permission and its grants. Fails with `NotFound` for unknown ids.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Returns whether a permission with this name exists.
    async fn permission_exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// Returns whether a permission with this `(resource, action)` pair exists.
    async fn permission_exists_by_key(&self, key: &PermissionKey) -> AppResult<bool>;
}

/// Storage capability for user to role links.
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Atomically inserts the link. Fails with `Conflict` when the pair
    /// already exists, even if a concurrent caller inserted it first.
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RoleAssignment>;

    /// Removes the link. Fails with `NotFound` when it does not exist.
    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists the roles assigned to a user ordered by name.
    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Lists the users holding a role.
    async fn list_role_users(&self, role_id: RoleId) -> AppResult<Vec<UserId>>;

    /// Returns whether the user holds the role.
    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// Returns whether the user holds a role with this name.
    async fn user_has_role_named(&self, user_id: UserId, role_name: &str) -> AppResult<bool>;

    /// Lists raw assignment rows of a user, including audit metadata.
    async fn list_user_role_assignments(&self, user_id: UserId)
    -> AppResult<Vec<RoleAssignment>>;
}

/// Storage capability for role to permission links.
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// Atomically inserts the link. Fails with `Conflict` when the pair
    /// already exists.
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment>;

    /// Removes the link. Fails with `NotFound` when it does not exist.
    async fn remove_permission(&self, role_id: RoleId, permission_id: PermissionId)
    -> AppResult<()>;

    /// Lists permissions granted to a role ordered by name.
    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Returns whether the role carries the permission.
    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;

    /// Lists the distinct permissions reachable from the user's roles.
    async fn list_user_permissions(&self, user_id: UserId) -> AppResult<Vec<Permission>>;

    /// Single join across user, role and permission links.
    async fn user_has_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool>;
}
