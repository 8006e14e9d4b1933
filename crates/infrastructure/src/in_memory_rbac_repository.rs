use std::collections::BTreeMap;

use tokio::sync::RwLock;

use warden_core::UserId;
use warden_domain::{
    Permission, PermissionId, Role, RoleAssignment, RoleId, RolePermissionAssignment,
};

mod assignments;
mod permissions;
mod roles;

#[derive(Debug, Default)]
struct RbacState {
    next_role_id: i64,
    next_permission_id: i64,
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    user_roles: BTreeMap<(UserId, RoleId), RoleAssignment>,
    role_permissions: BTreeMap<(RoleId, PermissionId), RolePermissionAssignment>,
}

impl RbacState {
    fn role_ids_of(&self, user_id: UserId) -> impl Iterator<Item = RoleId> + '_ {
        self.user_roles
            .keys()
            .filter(move |(stored_user_id, _)| *stored_user_id == user_id)
            .map(|(_, role_id)| *role_id)
    }

    fn permissions_of(&self, role_id: RoleId) -> impl Iterator<Item = &Permission> + '_ {
        self.role_permissions
            .keys()
            .filter(move |(stored_role_id, _)| *stored_role_id == role_id)
            .filter_map(move |(_, permission_id)| self.permissions.get(permission_id))
    }
}

/// In-memory implementation of the four RBAC store ports.
///
/// One lock guards every table, so each call observes and mutates a
/// consistent snapshot. Ids are allocated sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests;
