use async_trait::async_trait;
use chrono::Utc;
use warden_application::{CreateRoleInput, PageRequest, RoleRepository, UpdateRoleInput};
use warden_core::{AppError, AppResult};
use warden_domain::{Role, RoleId};

use super::InMemoryRbacRepository;

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|role| role.name == input.name) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        state.next_role_id += 1;
        let created_at = Utc::now();
        let role = Role {
            id: RoleId::new(state.next_role_id),
            name: input.name,
            display_name: input.display_name,
            description: input.description,
            is_system: input.is_system,
            created_at,
            updated_at: created_at,
        };
        state.roles.insert(role.id, role.clone());

        Ok(role)
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state.roles.values().find(|role| role.name == name).cloned())
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .values()
            .rev()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect())
    }

    async fn list_system_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .roles
            .values()
            .filter(|role| role.is_system)
            .cloned()
            .collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut state = self.state.write().await;
        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        role.display_name = input.display_name;
        role.description = input.description;
        role.updated_at = Utc::now();

        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let Some(role) = state.roles.get(&role_id) else {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        };
        if role.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name
            )));
        }

        state.roles.remove(&role_id);
        state
            .user_roles
            .retain(|(_, stored_role_id), _| *stored_role_id != role_id);
        state
            .role_permissions
            .retain(|(stored_role_id, _), _| *stored_role_id != role_id);

        Ok(())
    }

    async fn role_exists_by_name(&self, name: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.roles.values().any(|role| role.name == name))
    }
}
