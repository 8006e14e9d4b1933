//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod security;
mod token;
mod user;

pub use security::{
    Permission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RolePermissionAssignment, SystemPermission, SystemRole,
};
pub use token::TokenKind;
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, UserStatus, Username, validate_password,
};
