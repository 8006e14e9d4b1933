use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use warden_application::{PageRequest, RoleDraft};
use warden_core::{AuthenticatedUser, UserId};
use warden_domain::RoleId;

use crate::dto::{CreateRoleRequest, PageQuery, PermissionResponse, RoleResponse};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod permissions;
mod roles;

pub use assignments::{assign_user_role_handler, remove_user_role_handler};
pub use permissions::list_permissions_handler;
pub use roles::{create_role_handler, delete_role_handler, list_roles_handler};
