use super::*;

use crate::rbac_ports::{CreateRoleInput, PageRequest, UpdateRoleInput};

const ROLE_NAME_MAX_LENGTH: usize = 50;

impl AuthorizationService {
    /// Creates a non-system role. Fails with `Conflict` when the name is taken.
    pub async fn create_role(&self, draft: RoleDraft) -> AppResult<Role> {
        let name = require_text("role name", &draft.name)?;
        if name.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must be at most {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "role name must not contain whitespace".to_owned(),
            ));
        }

        if self.roles.role_exists_by_name(&name).await? {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let display_name = require_text("role display name", &draft.display_name)?;
        self.roles
            .create_role(CreateRoleInput {
                name,
                display_name,
                description: draft.description.trim().to_owned(),
                is_system: false,
            })
            .await
    }

    /// Returns a role by id.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.require_role(role_id).await
    }

    /// Returns a role by name.
    pub async fn get_role_by_name(&self, name: &str) -> AppResult<Role> {
        self.roles
            .find_role_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }

    /// Lists roles newest first.
    pub async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        self.roles.list_roles(page).await
    }

    /// Updates display name and description.
    pub async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let display_name = require_text("role display name", &input.display_name)?;
        self.roles
            .update_role(
                role_id,
                UpdateRoleInput {
                    display_name,
                    description: input.description.trim().to_owned(),
                },
            )
            .await
    }

    /// Deletes a non-system role. System roles fail with `Forbidden`.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let role = self.require_role(role_id).await?;
        if !role.can_delete() {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name
            )));
        }

        self.roles.delete_role(role_id).await
    }
}
