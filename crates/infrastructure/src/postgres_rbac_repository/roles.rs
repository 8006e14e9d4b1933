use super::*;

impl PostgresRbacRepository {
    pub(super) async fn create_role_impl(&self, input: CreateRoleInput) -> AppResult<Role> {
        let name = input.name.clone();
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, display_name, description, is_system)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, display_name, description, is_system, created_at, updated_at
            "#,
        )
        .bind(input.name)
        .bind(input.display_name)
        .bind(input.description)
        .bind(input.is_system)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            map_conflict(
                error,
                || format!("role '{name}' already exists"),
                "create role",
            )
        })?;

        Ok(Role::from(row))
    }

    pub(super) async fn find_role_by_id_impl(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, created_at, updated_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by id: {error}")))?;

        Ok(row.map(Role::from))
    }

    pub(super) async fn find_role_by_name_impl(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, created_at, updated_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by name: {error}")))?;

        Ok(row.map(Role::from))
    }

    pub(super) async fn list_roles_impl(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, created_at, updated_at
            FROM roles
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn list_system_roles_impl(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, created_at, updated_at
            FROM roles
            WHERE is_system = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list system roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn update_role_impl(
        &self,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET display_name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, display_name, description, is_system, created_at, updated_at
            "#,
        )
        .bind(role_id.as_i64())
        .bind(input.display_name)
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update role: {error}")))?;

        row.map(Role::from)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1 AND is_system = FALSE
            "#,
        )
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if deleted.rows_affected() > 0 {
            return Ok(());
        }

        match self.find_role_by_id_impl(role_id).await? {
            Some(role) => Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name
            ))),
            None => Err(AppError::NotFound(format!("role '{role_id}' does not exist"))),
        }
    }

    pub(super) async fn role_exists_by_name_impl(&self, name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM roles WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check role name: {error}")))
    }
}
