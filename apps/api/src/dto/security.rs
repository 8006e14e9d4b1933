use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_domain::{Permission, Role};

/// Incoming payload for custom role creation.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

/// API representation of a role.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub is_system: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// API representation of a permission.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub resource: String,
    pub action: String,
    pub is_system: bool,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id.as_i64(),
            name: value.name,
            display_name: value.display_name,
            description: value.description,
            is_system: value.is_system,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            id: value.id.as_i64(),
            name: value.name,
            display_name: value.display_name,
            description: value.description,
            resource: value.resource,
            action: value.action,
            is_system: value.is_system,
        }
    }
}
