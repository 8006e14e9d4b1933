use warden_domain::PermissionKey;

use super::*;

use crate::rbac_ports::{CreatePermissionInput, PageRequest, UpdatePermissionInput};

impl AuthorizationService {
    /// Creates a non-system permission named `resource:action`.
    pub async fn create_permission(&self, draft: PermissionDraft) -> AppResult<Permission> {
        let key = PermissionKey::new(draft.resource.trim(), draft.action.trim())?;
        let name = key.name();

        if self.permissions.permission_exists_by_name(&name).await?
            || self.permissions.permission_exists_by_key(&key).await?
        {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        let display_name = require_text("permission display name", &draft.display_name)?;
        self.permissions
            .create_permission(CreatePermissionInput {
                name,
                display_name,
                description: draft.description.trim().to_owned(),
                resource: key.resource().to_owned(),
                action: key.action().to_owned(),
                is_system: false,
            })
            .await
    }

    /// Returns a permission by id.
    pub async fn get_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.require_permission_row(permission_id).await
    }

    /// Returns a permission by name.
    pub async fn get_permission_by_name(&self, name: &str) -> AppResult<Permission> {
        self.permissions
            .find_permission_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission '{name}' does not exist")))
    }

    /// Lists permissions newest first.
    pub async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<Permission>> {
        self.permissions.list_permissions(page).await
    }

    /// Lists the permissions of one resource group.
    pub async fn list_permissions_by_resource(&self, resource: &str) -> AppResult<Vec<Permission>> {
        self.permissions.list_permissions_by_resource(resource).await
    }

    /// Updates display name and description.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let display_name = require_text("permission display name", &input.display_name)?;
        self.permissions
            .update_permission(
                permission_id,
                UpdatePermissionInput {
                    display_name,
                    description: input.description.trim().to_owned(),
                },
            )
            .await
    }

    /// Deletes a non-system permission. System permissions fail with `Forbidden`.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let permission = self.require_permission_row(permission_id).await?;
        if !permission.can_delete() {
            return Err(AppError::Forbidden(format!(
                "system permission '{}' cannot be deleted",
                permission.name
            )));
        }

        self.permissions.delete_permission(permission_id).await
    }
}
