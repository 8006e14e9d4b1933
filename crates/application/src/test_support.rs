//! In-crate fakes shared by service tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use warden_core::{AppError, AppResult, UserId};
use warden_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RolePermissionAssignment,
};

use crate::rbac_ports::{
    CreatePermissionInput, CreateRoleInput, PageRequest, PermissionRepository,
    RolePermissionRepository, RoleRepository, UpdatePermissionInput, UpdateRoleInput,
    UserRoleRepository,
};

#[derive(Default)]
pub(crate) struct FakeState {
    pub(crate) next_id: i64,
    pub(crate) roles: Vec<Role>,
    pub(crate) permissions: Vec<Permission>,
    pub(crate) user_roles: Vec<(UserId, RoleId)>,
    pub(crate) role_permissions: Vec<(RoleId, PermissionId)>,
}

impl FakeState {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct FakeRbacStore {
    pub(crate) state: Mutex<FakeState>,
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state.roles.iter().any(|role| role.name == input.name) {
            return Err(AppError::Conflict(format!("role '{}' exists", input.name)));
        }

        let now = Utc::now();
        let role = Role {
            id: RoleId::new(state.allocate()),
            name: input.name,
            display_name: input.display_name,
            description: input.description,
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        };
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|role| role.id == role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|role| role.name == name).cloned())
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .rev()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect())
    }

    async fn list_system_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().filter(|role| role.is_system).cloned().collect())
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}'")))?;
        role.display_name = input.display_name;
        role.description = input.description;
        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.roles.retain(|role| role.id != role_id);
        state.user_roles.retain(|(_, id)| *id != role_id);
        Ok(())
    }

    async fn role_exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_role_by_name(name).await?.is_some())
    }
}

#[async_trait]
impl PermissionRepository for FakeRbacStore {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
        if state.permissions.iter().any(|permission| {
            permission.name == input.name
                || (permission.resource == input.resource && permission.action == input.action)
        }) {
            return Err(AppError::Conflict(format!(
                "permission '{}' exists",
                input.name
            )));
        }

        let now = Utc::now();
        let permission = Permission {
            id: PermissionId::new(state.allocate()),
            name: input.name,
            display_name: input.display_name,
            description: input.description,
            resource: input.resource,
            action: input.action,
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        };
        state.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn find_permission_by_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.id == permission_id)
            .cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .rev()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect())
    }

    async fn list_system_permissions(&self) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|permission| permission.is_system)
            .cloned()
            .collect())
    }

    async fn list_permissions_by_resource(&self, resource: &str) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|permission| permission.resource == resource)
            .cloned()
            .collect())
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
        let permission = state
            .permissions
            .iter_mut()
            .find(|permission| permission.id == permission_id)
            .ok_or_else(|| AppError::NotFound(format!("permission '{permission_id}'")))?;
        permission.display_name = input.display_name;
        permission.description = input.description;
        Ok(permission.clone())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .permissions
            .retain(|permission| permission.id != permission_id);
        Ok(())
    }

    async fn permission_exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_permission_by_name(name).await?.is_some())
    }

    async fn permission_exists_by_key(&self, key: &PermissionKey) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.permissions.iter().any(|permission| {
            permission.resource == key.resource() && permission.action == key.action()
        }))
    }
}

#[async_trait]
impl UserRoleRepository for FakeRbacStore {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RoleAssignment> {
        let mut state = self.state.lock().await;
        if state.user_roles.contains(&(user_id, role_id)) {
            return Err(AppError::Conflict("already assigned".to_owned()));
        }
        state.user_roles.push((user_id, role_id));
        Ok(RoleAssignment {
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        })
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.user_roles.retain(|pair| *pair != (user_id, role_id));
        Ok(())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .filter(|role| state.user_roles.contains(&(user_id, role.id)))
            .cloned()
            .collect())
    }

    async fn list_role_users(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        let state = self.state.lock().await;
        Ok(state
            .user_roles
            .iter()
            .filter(|(_, id)| *id == role_id)
            .map(|(user_id, _)| *user_id)
            .collect())
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.user_roles.contains(&(user_id, role_id)))
    }

    async fn user_has_role_named(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        let roles = self.list_user_roles(user_id).await?;
        Ok(roles.iter().any(|role| role.name == role_name))
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.lock().await;
        Ok(state
            .user_roles
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(user_id, role_id)| RoleAssignment {
                user_id: *user_id,
                role_id: *role_id,
                assigned_by: None,
                assigned_at: Utc::now(),
            })
            .collect())
    }
}

#[async_trait]
impl RolePermissionRepository for FakeRbacStore {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment> {
        let mut state = self.state.lock().await;
        if state.role_permissions.contains(&(role_id, permission_id)) {
            return Err(AppError::Conflict("already granted".to_owned()));
        }
        state.role_permissions.push((role_id, permission_id));
        Ok(RolePermissionAssignment {
            role_id,
            permission_id,
            assigned_by,
            assigned_at: Utc::now(),
        })
    }

    async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .role_permissions
            .retain(|pair| *pair != (role_id, permission_id));
        Ok(())
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .filter(|permission| state.role_permissions.contains(&(role_id, permission.id)))
            .cloned()
            .collect())
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.role_permissions.contains(&(role_id, permission_id)))
    }

    // Returns one entry per (role, permission) link so duplicates are visible.
    async fn list_user_permissions(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        let mut permissions = Vec::new();
        for (_, role_id) in state.user_roles.iter().filter(|(id, _)| *id == user_id) {
            for permission in &state.permissions {
                if state.role_permissions.contains(&(*role_id, permission.id)) {
                    permissions.push(permission.clone());
                }
            }
        }
        Ok(permissions)
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        let permissions = self.list_user_permissions(user_id).await?;
        Ok(permissions
            .iter()
            .any(|permission| permission.resource == resource && permission.action == action))
    }
}
