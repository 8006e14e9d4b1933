use tracing::info;
use warden_domain::{SystemPermission, SystemRole};

use super::*;

use crate::rbac_ports::{CreatePermissionInput, CreateRoleInput};

/// Rows created by one bootstrap run. All zero on reruns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// System roles inserted.
    pub roles_created: usize,
    /// System permissions inserted.
    pub permissions_created: usize,
    /// Role to permission grants inserted.
    pub grants_created: usize,
}

impl AuthorizationService {
    /// Ensures the system roles, permission catalog and default grants exist.
    ///
    /// Safe to run any number of times. A `Conflict` from a concurrent
    /// bootstrap counts as already present.
    pub async fn initialize_system_data(&self) -> AppResult<BootstrapReport> {
        let mut report = BootstrapReport::default();

        for role in SystemRole::all() {
            if self.ensure_system_role(*role).await? {
                report.roles_created += 1;
            }
        }

        for permission in SystemPermission::all() {
            if self.ensure_system_permission(*permission).await? {
                report.permissions_created += 1;
            }
        }

        for role in SystemRole::all() {
            report.grants_created += self.ensure_default_grants(*role).await?;
        }

        info!(
            roles_created = report.roles_created,
            permissions_created = report.permissions_created,
            grants_created = report.grants_created,
            "system data initialized"
        );

        Ok(report)
    }

    async fn ensure_system_role(&self, role: SystemRole) -> AppResult<bool> {
        if self.roles.role_exists_by_name(role.as_str()).await? {
            return Ok(false);
        }

        let result = self
            .roles
            .create_role(CreateRoleInput {
                name: role.as_str().to_owned(),
                display_name: role.display_name().to_owned(),
                description: role.description().to_owned(),
                is_system: true,
            })
            .await;

        match result {
            Ok(created) => {
                info!(role = %created.name, "created system role");
                Ok(true)
            }
            Err(AppError::Conflict(_)) => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn ensure_system_permission(&self, permission: SystemPermission) -> AppResult<bool> {
        let name = permission.name();
        if self.permissions.permission_exists_by_name(&name).await? {
            return Ok(false);
        }

        let result = self
            .permissions
            .create_permission(CreatePermissionInput {
                name,
                display_name: permission.display_name(),
                description: permission.description(),
                resource: permission.resource().to_owned(),
                action: permission.action().to_owned(),
                is_system: true,
            })
            .await;

        match result {
            Ok(created) => {
                info!(permission = %created.name, "created system permission");
                Ok(true)
            }
            Err(AppError::Conflict(_)) => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn ensure_default_grants(&self, role: SystemRole) -> AppResult<usize> {
        let role_row = self.get_role_by_name(role.as_str()).await?;
        let mut created = 0;

        for permission in SystemPermission::granted_to(role) {
            let permission_row = self.get_permission_by_name(&permission.name()).await?;
            if self
                .role_permissions
                .role_has_permission(role_row.id, permission_row.id)
                .await?
            {
                continue;
            }

            match self
                .role_permissions
                .assign_permission(role_row.id, permission_row.id, None)
                .await
            {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => {}
                Err(error) => return Err(error),
            }
        }

        Ok(created)
    }
}
