use super::*;

impl PostgresRbacRepository {
    pub(super) async fn assign_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment> {
        let row = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, assigned_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            RETURNING role_id, permission_id, assigned_by, assigned_at
            "#,
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .bind(assigned_by.map(|value| value.as_i64()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            if sqlstate(&error).as_deref() == Some("23503") {
                return AppError::NotFound(format!(
                    "role '{role_id}' or permission '{permission_id}' does not exist"
                ));
            }

            AppError::Internal(format!("failed to assign permission: {error}"))
        })?;

        row.map(RolePermissionAssignment::from).ok_or_else(|| {
            AppError::Conflict(format!(
                "permission '{permission_id}' is already granted to role '{role_id}'"
            ))
        })
    }

    pub(super) async fn remove_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND permission_id = $2
            "#,
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove permission: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' is not granted to role '{role_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_role_permissions_impl(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permissions.id, permissions.name, permissions.display_name,
                   permissions.description, permissions.resource, permissions.action,
                   permissions.is_system, permissions.created_at, permissions.updated_at
            FROM permissions
            INNER JOIN role_permissions ON role_permissions.permission_id = permissions.id
            WHERE role_permissions.role_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn role_has_permission_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM role_permissions WHERE role_id = $1 AND permission_id = $2
            )
            "#,
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check role permission: {error}")))
    }

    pub(super) async fn list_user_permissions_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT permissions.id, permissions.name, permissions.display_name,
                   permissions.description, permissions.resource, permissions.action,
                   permissions.is_system, permissions.created_at, permissions.updated_at
            FROM permissions
            INNER JOIN role_permissions ON role_permissions.permission_id = permissions.id
            INNER JOIN user_roles ON user_roles.role_id = role_permissions.role_id
            WHERE user_roles.user_id = $1
            ORDER BY permissions.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list user permissions: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn user_has_permission_impl(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                INNER JOIN role_permissions ON role_permissions.role_id = user_roles.role_id
                INNER JOIN permissions ON permissions.id = role_permissions.permission_id
                WHERE user_roles.user_id = $1
                  AND permissions.resource = $2
                  AND permissions.action = $3
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(resource)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check user permission: {error}"))
        })
    }
}
