mod inputs;
mod repositories;

pub use inputs::{
    CreatePermissionInput, CreateRoleInput, PageRequest, UpdatePermissionInput, UpdateRoleInput,
};
pub use repositories::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};
