use async_trait::async_trait;
use chrono::Utc;
use warden_application::{
    CreatePermissionInput, PageRequest, PermissionRepository, UpdatePermissionInput,
};
use warden_core::{AppError, AppResult};
use warden_domain::{Permission, PermissionId, PermissionKey};

use super::InMemoryRbacRepository;

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        if state.permissions.values().any(|permission| {
            permission.name == input.name
                || (permission.resource == input.resource && permission.action == input.action)
        }) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.name
            )));
        }

        state.next_permission_id += 1;
        let created_at = Utc::now();
        let permission = Permission {
            id: PermissionId::new(state.next_permission_id),
            name: input.name,
            display_name: input.display_name,
            description: input.description,
            resource: input.resource,
            action: input.action,
            is_system: input.is_system,
            created_at,
            updated_at: created_at,
        };
        state.permissions.insert(permission.id, permission.clone());

        Ok(permission)
    }

    async fn find_permission_by_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self.state.read().await.permissions.get(&permission_id).cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .rev()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect())
    }

    async fn list_system_permissions(&self) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state
            .permissions
            .values()
            .filter(|permission| permission.is_system)
            .cloned()
            .collect();
        permissions.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(permissions)
    }

    async fn list_permissions_by_resource(&self, resource: &str) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        let mut permissions: Vec<Permission> = state
            .permissions
            .values()
            .filter(|permission| permission.resource == resource)
            .cloned()
            .collect();
        permissions.sort_by(|left, right| left.action.cmp(&right.action));
        Ok(permissions)
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let mut state = self.state.write().await;
        let permission = state.permissions.get_mut(&permission_id).ok_or_else(|| {
            AppError::NotFound(format!("permission '{permission_id}' does not exist"))
        })?;

        permission.display_name = input.display_name;
        permission.description = input.description;
        permission.updated_at = Utc::now();

        Ok(permission.clone())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let Some(permission) = state.permissions.get(&permission_id) else {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        };
        if permission.is_system {
            return Err(AppError::Forbidden(format!(
                "system permission '{}' cannot be deleted",
                permission.name
            )));
        }

        state.permissions.remove(&permission_id);
        state
            .role_permissions
            .retain(|(_, stored_permission_id), _| *stored_permission_id != permission_id);

        Ok(())
    }

    async fn permission_exists_by_name(&self, name: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .values()
            .any(|permission| permission.name == name))
    }

    async fn permission_exists_by_key(&self, key: &PermissionKey) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.permissions.values().any(|permission| {
            permission.resource == key.resource() && permission.action == key.action()
        }))
    }
}
