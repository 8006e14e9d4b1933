mod auth;
mod common;
mod security;

pub use auth::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest, TokenResponse,
    UserResponse,
};
pub use common::{HealthResponse, PageQuery};
pub use security::{CreateRoleRequest, PermissionResponse, RoleResponse};
