use std::collections::BTreeMap;

use super::*;

impl AuthorizationService {
    /// Returns whether the user holds a role with this name.
    pub async fn has_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        self.user_roles.user_has_role_named(user_id, role_name).await
    }

    /// Returns whether any role of the user carries `(resource, action)`.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        self.role_permissions
            .user_has_permission(user_id, resource, action)
            .await
    }

    /// Ensures the user has `(resource, action)`, failing with `Forbidden`.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<()> {
        if self.has_permission(user_id, resource, action).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "'{}' is missing permission '{resource}:{action}'",
            user_id.subject()
        )))
    }

    /// Returns the union of permissions across the user's roles.
    ///
    /// Each permission appears once, ordered by name.
    pub async fn get_user_permissions(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let permissions = self.role_permissions.list_user_permissions(user_id).await?;

        let unique: BTreeMap<String, Permission> = permissions
            .into_iter()
            .map(|permission| (permission.name.clone(), permission))
            .collect();

        Ok(unique.into_values().collect())
    }
}
