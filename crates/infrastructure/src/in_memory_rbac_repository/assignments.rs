use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use warden_application::{RolePermissionRepository, UserRoleRepository};
use warden_core::{AppError, AppResult, UserId};
use warden_domain::{
    Permission, PermissionId, Role, RoleAssignment, RoleId, RolePermissionAssignment,
};

use super::InMemoryRbacRepository;

#[async_trait]
impl UserRoleRepository for InMemoryRbacRepository {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RoleAssignment> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        if state.user_roles.contains_key(&(user_id, role_id)) {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is already assigned to '{}'",
                user_id.subject()
            )));
        }

        let assignment = RoleAssignment {
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        };
        state
            .user_roles
            .insert((user_id, role_id), assignment.clone());

        Ok(assignment)
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.user_roles.remove(&(user_id, role_id)).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' is not assigned to '{}'",
                user_id.subject()
            )));
        }

        Ok(())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .role_ids_of(user_id)
            .filter_map(|role_id| state.roles.get(&role_id).cloned())
            .collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(roles)
    }

    async fn list_role_users(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        let state = self.state.read().await;
        Ok(state
            .user_roles
            .keys()
            .filter(|(_, stored_role_id)| *stored_role_id == role_id)
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.user_roles.contains_key(&(user_id, role_id)))
    }

    async fn user_has_role_named(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.role_ids_of(user_id).any(|role_id| {
            state
                .roles
                .get(&role_id)
                .is_some_and(|role| role.name == role_name)
        }))
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.read().await;
        Ok(state
            .user_roles
            .values()
            .filter(|assignment| assignment.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RolePermissionRepository for InMemoryRbacRepository {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) || !state.permissions.contains_key(&permission_id)
        {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' or permission '{permission_id}' does not exist"
            )));
        }
        if state
            .role_permissions
            .contains_key(&(role_id, permission_id))
        {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' is already granted to role '{role_id}'"
            )));
        }

        let assignment = RolePermissionAssignment {
            role_id,
            permission_id,
            assigned_by,
            assigned_at: Utc::now(),
        };
        state
            .role_permissions
            .insert((role_id, permission_id), assignment.clone());

        Ok(assignment)
    }

    async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state
            .role_permissions
            .remove(&(role_id, permission_id))
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' is not granted to role '{role_id}'"
            )));
        }

        Ok(())
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state.permissions_of(role_id).cloned().collect();
        permissions.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(permissions)
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .role_permissions
            .contains_key(&(role_id, permission_id)))
    }

    async fn list_user_permissions(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let guard = self.state.read().await;
        let state = &*guard;
        let unique: BTreeMap<PermissionId, Permission> = state
            .role_ids_of(user_id)
            .flat_map(|role_id| state.permissions_of(role_id))
            .map(|permission| (permission.id, permission.clone()))
            .collect();

        let mut permissions: Vec<Permission> = unique.into_values().collect();
        permissions.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(permissions)
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        let guard = self.state.read().await;
        let state = &*guard;
        Ok(state.role_ids_of(user_id).any(|role_id| {
            state
                .permissions_of(role_id)
                .any(|permission| permission.resource == resource && permission.action == action)
        }))
    }
}
