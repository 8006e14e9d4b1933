//! RBAC entities and the fixed system catalog.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, UserId};

/// Identifier of a persisted role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a role identifier from a stored numeric value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a persisted permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a permission identifier from a stored numeric value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Named bundle of permissions granted to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique machine name, such as `admin`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// System roles are created by bootstrap and cannot be deleted.
    pub is_system: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Returns whether the administrative API may delete this role.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        !self.is_system
    }
}

/// Atomic `(resource, action)` capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Unique machine name, such as `user:read`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Resource group the permission applies to.
    pub resource: String,
    /// Action allowed on the resource.
    pub action: String,
    /// System permissions are created by bootstrap and cannot be deleted.
    pub is_system: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Returns whether the administrative API may delete this permission.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        !self.is_system
    }

    /// Returns the `(resource, action)` pair of this permission.
    #[must_use]
    pub fn key(&self) -> PermissionKey {
        PermissionKey {
            resource: self.resource.clone(),
            action: self.action.clone(),
        }
    }
}

/// Validated `(resource, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionKey {
    resource: String,
    action: String,
}

impl PermissionKey {
    /// Creates a key; both parts must be non-empty and must not contain `:`.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> AppResult<Self> {
        let resource = resource.into().trim().to_owned();
        let action = action.into().trim().to_owned();

        for (label, part) in [("resource", &resource), ("action", &action)] {
            if part.is_empty() {
                return Err(AppError::Validation(format!(
                    "permission {label} must not be empty"
                )));
            }
            if part.contains(':') || part.chars().any(char::is_whitespace) {
                return Err(AppError::Validation(format!(
                    "permission {label} '{part}' must not contain ':' or whitespace"
                )));
            }
        }

        Ok(Self { resource, action })
    }

    /// Returns the resource part.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the action part.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Returns the canonical permission name `resource:action`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((resource, action)) = value.split_once(':') else {
            return Err(AppError::Validation(format!(
                "permission '{value}' must have the form 'resource:action'"
            )));
        };

        Self::new(resource, action)
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

/// Link granting a role to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Assignee.
    pub user_id: UserId,
    /// Granted role.
    pub role_id: RoleId,
    /// Acting identity, `None` for bootstrap-created links.
    pub assigned_by: Option<UserId>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Link granting a permission to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionAssignment {
    /// Role receiving the permission.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
    /// Acting identity, `None` for bootstrap-created links.
    pub assigned_by: Option<UserId>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Roles created by system bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    /// Holds every system permission.
    Admin,
    /// Default role granted at registration.
    User,
}

impl SystemRole {
    /// Returns the unique role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::User => "User",
        }
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator with full system management rights",
            Self::User => "Regular user",
        }
    }

    /// Returns all system roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemRole] = &[SystemRole::Admin, SystemRole::User];

        ALL
    }
}

/// Fixed permission catalog created by system bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// View user records.
    UserRead,
    /// Modify user records.
    UserWrite,
    /// Delete user records.
    UserDelete,
    /// Fully manage users.
    UserManage,
    /// View roles.
    RoleRead,
    /// Modify roles.
    RoleWrite,
    /// Delete roles.
    RoleDelete,
    /// Fully manage roles.
    RoleManage,
    /// View permissions.
    PermissionRead,
    /// Modify permissions.
    PermissionWrite,
    /// Delete permissions.
    PermissionDelete,
    /// Fully manage permissions.
    PermissionManage,
    /// Manage the system itself.
    SystemManage,
}

impl SystemPermission {
    /// Returns the resource group.
    #[must_use]
    pub fn resource(&self) -> &'static str {
        match self {
            Self::UserRead | Self::UserWrite | Self::UserDelete | Self::UserManage => "user",
            Self::RoleRead | Self::RoleWrite | Self::RoleDelete | Self::RoleManage => "role",
            Self::PermissionRead
            | Self::PermissionWrite
            | Self::PermissionDelete
            | Self::PermissionManage => "permission",
            Self::SystemManage => "system",
        }
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::UserRead | Self::RoleRead | Self::PermissionRead => "read",
            Self::UserWrite | Self::RoleWrite | Self::PermissionWrite => "write",
            Self::UserDelete | Self::RoleDelete | Self::PermissionDelete => "delete",
            Self::UserManage | Self::RoleManage | Self::PermissionManage | Self::SystemManage => {
                "manage"
            }
        }
    }

    /// Returns the unique permission name, `resource:action`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}:{}", self.resource(), self.action())
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let resource = self.resource();
        match self.action() {
            "read" => format!("View {resource}s"),
            "write" => format!("Modify {resource}s"),
            "delete" => format!("Delete {resource}s"),
            _ if resource == "system" => "Manage system".to_owned(),
            _ => format!("Manage {resource}s"),
        }
    }

    /// Returns the permission description.
    #[must_use]
    pub fn description(&self) -> String {
        format!("Allows '{}' on the '{}' resource", self.action(), self.resource())
    }

    /// Returns the permission key.
    #[must_use]
    pub fn key(&self) -> PermissionKey {
        PermissionKey {
            resource: self.resource().to_owned(),
            action: self.action().to_owned(),
        }
    }

    /// Returns the full system catalog.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemPermission] = &[
            SystemPermission::UserRead,
            SystemPermission::UserWrite,
            SystemPermission::UserDelete,
            SystemPermission::UserManage,
            SystemPermission::RoleRead,
            SystemPermission::RoleWrite,
            SystemPermission::RoleDelete,
            SystemPermission::RoleManage,
            SystemPermission::PermissionRead,
            SystemPermission::PermissionWrite,
            SystemPermission::PermissionDelete,
            SystemPermission::PermissionManage,
            SystemPermission::SystemManage,
        ];

        ALL
    }

    /// Returns the permissions granted to a system role by bootstrap.
    #[must_use]
    pub fn granted_to(role: SystemRole) -> &'static [Self] {
        match role {
            SystemRole::Admin => Self::all(),
            SystemRole::User => &[SystemPermission::UserRead],
        }
    }
}
