use super::*;

impl PostgresRbacRepository {
    pub(super) async fn assign_role_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RoleAssignment> {
        let row = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            INSERT INTO user_roles (user_id, role_id, assigned_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, role_id) DO NOTHING
            RETURNING user_id, role_id, assigned_by, assigned_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .bind(assigned_by.map(|value| value.as_i64()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            if sqlstate(&error).as_deref() == Some("23503") {
                return AppError::NotFound(format!("role '{role_id}' does not exist"));
            }

            AppError::Internal(format!("failed to assign role: {error}"))
        })?;

        row.map(RoleAssignment::from).ok_or_else(|| {
            AppError::Conflict(format!(
                "role '{role_id}' is already assigned to '{}'",
                user_id.subject()
            ))
        })
    }

    pub(super) async fn remove_role_impl(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove role: {error}")))?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' is not assigned to '{}'",
                user_id.subject()
            )));
        }

        Ok(())
    }

    pub(super) async fn list_user_roles_impl(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT roles.id, roles.name, roles.display_name, roles.description,
                   roles.is_system, roles.created_at, roles.updated_at
            FROM roles
            INNER JOIN user_roles ON user_roles.role_id = roles.id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn list_role_users_impl(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        let user_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM user_roles
            WHERE role_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role users: {error}")))?;

        Ok(user_ids.into_iter().map(UserId::new).collect())
    }

    pub(super) async fn user_has_role_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check user role: {error}")))
    }

    pub(super) async fn user_has_role_named_impl(
        &self,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                INNER JOIN roles ON roles.id = user_roles.role_id
                WHERE user_roles.user_id = $1 AND roles.name = $2
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check user role: {error}")))
    }

    pub(super) async fn list_user_role_assignments_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT user_id, role_id, assigned_by, assigned_at
            FROM user_roles
            WHERE user_id = $1
            ORDER BY assigned_at, role_id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list user role assignments: {error}"))
        })?;

        Ok(rows.into_iter().map(RoleAssignment::from).collect())
    }
}
