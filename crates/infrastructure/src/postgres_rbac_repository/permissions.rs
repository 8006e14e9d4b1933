use super::*;

impl PostgresRbacRepository {
    pub(super) async fn create_permission_impl(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        let name = input.name.clone();
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (name, display_name, description, resource, action, is_system)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, display_name, description, resource, action, is_system,
                      created_at, updated_at
            "#,
        )
        .bind(input.name)
        .bind(input.display_name)
        .bind(input.description)
        .bind(input.resource)
        .bind(input.action)
        .bind(input.is_system)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            map_conflict(
                error,
                || format!("permission '{name}' already exists"),
                "create permission",
            )
        })?;

        Ok(Permission::from(row))
    }

    pub(super) async fn find_permission_by_id_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, display_name, description, resource, action, is_system,
                   created_at, updated_at
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission by id: {error}")))?;

        Ok(row.map(Permission::from))
    }

    pub(super) async fn find_permission_by_name_impl(
        &self,
        name: &str,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, display_name, description, resource, action, is_system,
                   created_at, updated_at
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission by name: {error}"))
        })?;

        Ok(row.map(Permission::from))
    }

    pub(super) async fn list_permissions_impl(
        &self,
        page: PageRequest,
    ) -> AppResult<Vec<Permission>> {
        let (limit, offset) = page_bounds(page);
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, display_name, description, resource, action, is_system,
                   created_at, updated_at
            FROM permissions
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn list_system_permissions_impl(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, display_name, description, resource, action, is_system,
                   created_at, updated_at
            FROM permissions
            WHERE is_system = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list system permissions: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn list_permissions_by_resource_impl(
        &self,
        resource: &str,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, display_name, description, resource, action, is_system,
                   created_at, updated_at
            FROM permissions
            WHERE resource = $1
            ORDER BY action
            "#,
        )
        .bind(resource)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permissions by resource: {error}"))
        })?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn update_permission_impl(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            UPDATE permissions
            SET display_name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, display_name, description, resource, action, is_system,
                      created_at, updated_at
            "#,
        )
        .bind(permission_id.as_i64())
        .bind(input.display_name)
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update permission: {error}")))?;

        row.map(Permission::from).ok_or_else(|| {
            AppError::NotFound(format!("permission '{permission_id}' does not exist"))
        })
    }

    pub(super) async fn delete_permission_impl(&self, permission_id: PermissionId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM permissions
            WHERE id = $1 AND is_system = FALSE
            "#,
        )
        .bind(permission_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete permission: {error}")))?;

        if deleted.rows_affected() > 0 {
            return Ok(());
        }

        match self.find_permission_by_id_impl(permission_id).await? {
            Some(permission) => Err(AppError::Forbidden(format!(
                "system permission '{}' cannot be deleted",
                permission.name
            ))),
            None => Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            ))),
        }
    }

    pub(super) async fn permission_exists_by_name_impl(&self, name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM permissions WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check permission name: {error}")))
    }

    pub(super) async fn permission_exists_by_key_impl(
        &self,
        key: &PermissionKey,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM permissions WHERE resource = $1 AND action = $2)
            "#,
        )
        .bind(key.resource())
        .bind(key.action())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check permission key: {error}")))
    }
}
