//! PostgreSQL-backed role, permission and assignment stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_application::{
    CreatePermissionInput, CreateRoleInput, PageRequest, PermissionRepository,
    RolePermissionRepository, RoleRepository, UpdatePermissionInput, UpdateRoleInput,
    UserRoleRepository,
};
use warden_core::{AppError, AppResult, UserId};
use warden_domain::{
    Permission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RolePermissionAssignment,
};

mod permissions;
mod role_permissions;
mod roles;
mod user_roles;

/// PostgreSQL implementation of the four RBAC store ports.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    display_name: String,
    description: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::new(row.id),
            name: row.name,
            display_name: row.display_name,
            description: row.description,
            is_system: row.is_system,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: i64,
    name: String,
    display_name: String,
    description: String,
    resource: String,
    action: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: PermissionId::new(row.id),
            name: row.name,
            display_name: row.display_name,
            description: row.description,
            resource: row.resource,
            action: row.action,
            is_system: row.is_system,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    user_id: i64,
    role_id: i64,
    assigned_by: Option<i64>,
    assigned_at: DateTime<Utc>,
}

impl From<RoleAssignmentRow> for RoleAssignment {
    fn from(row: RoleAssignmentRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            role_id: RoleId::new(row.role_id),
            assigned_by: row.assigned_by.map(UserId::new),
            assigned_at: row.assigned_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: i64,
    permission_id: i64,
    assigned_by: Option<i64>,
    assigned_at: DateTime<Utc>,
}

impl From<RolePermissionRow> for RolePermissionAssignment {
    fn from(row: RolePermissionRow) -> Self {
        Self {
            role_id: RoleId::new(row.role_id),
            permission_id: PermissionId::new(row.permission_id),
            assigned_by: row.assigned_by.map(UserId::new),
            assigned_at: row.assigned_at,
        }
    }
}

fn page_bounds(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit()).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

fn sqlstate(error: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().map(|code| code.into_owned());
    }

    None
}

fn map_conflict(error: sqlx::Error, conflict: impl FnOnce() -> String, context: &str) -> AppError {
    if sqlstate(&error).as_deref() == Some("23505") {
        return AppError::Conflict(conflict());
    }

    AppError::Internal(format!("failed to {context}: {error}"))
}

#[async_trait]
impl RoleRepository for PostgresRbacRepository {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        self.create_role_impl(input).await
    }

    async fn find_role_by_id(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_by_id_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.find_role_by_name_impl(name).await
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<Role>> {
        self.list_roles_impl(page).await
    }

    async fn list_system_roles(&self) -> AppResult<Vec<Role>> {
        self.list_system_roles_impl().await
    }

    async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        self.update_role_impl(role_id, input).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn role_exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.role_exists_by_name_impl(name).await
    }
}

#[async_trait]
impl PermissionRepository for PostgresRbacRepository {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<Permission> {
        self.create_permission_impl(input).await
    }

    async fn find_permission_by_id(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        self.find_permission_by_id_impl(permission_id).await
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        self.find_permission_by_name_impl(name).await
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl(page).await
    }

    async fn list_system_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list_system_permissions_impl().await
    }

    async fn list_permissions_by_resource(&self, resource: &str) -> AppResult<Vec<Permission>> {
        self.list_permissions_by_resource_impl(resource).await
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        self.update_permission_impl(permission_id, input).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn permission_exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.permission_exists_by_name_impl(name).await
    }

    async fn permission_exists_by_key(&self, key: &PermissionKey) -> AppResult<bool> {
        self.permission_exists_by_key_impl(key).await
    }
}

#[async_trait]
impl UserRoleRepository for PostgresRbacRepository {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RoleAssignment> {
        self.assign_role_impl(user_id, role_id, assigned_by).await
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.remove_role_impl(user_id, role_id).await
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.list_user_roles_impl(user_id).await
    }

    async fn list_role_users(&self, role_id: RoleId) -> AppResult<Vec<UserId>> {
        self.list_role_users_impl(role_id).await
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        self.user_has_role_impl(user_id, role_id).await
    }

    async fn user_has_role_named(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        self.user_has_role_named_impl(user_id, role_name).await
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.list_user_role_assignments_impl(user_id).await
    }
}

#[async_trait]
impl RolePermissionRepository for PostgresRbacRepository {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
        assigned_by: Option<UserId>,
    ) -> AppResult<RolePermissionAssignment> {
        self.assign_permission_impl(role_id, permission_id, assigned_by)
            .await
    }

    async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.remove_permission_impl(role_id, permission_id).await
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        self.list_role_permissions_impl(role_id).await
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        self.role_has_permission_impl(role_id, permission_id).await
    }

    async fn list_user_permissions(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        self.list_user_permissions_impl(user_id).await
    }

    async fn user_has_permission(
        &self,
        user_id: UserId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        self.user_has_permission_impl(user_id, resource, action)
            .await
    }
}
