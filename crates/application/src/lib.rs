//! Application services and ports.

#![forbid(unsafe_code)]

mod account_service;
mod authorization_service;
mod clock;
mod rbac_ports;
mod token_ports;

#[cfg(test)]
mod test_support;

pub use account_service::{
    AccountService, IdentityRecord, IdentityRepository, LoginOutcome, NewIdentity, PasswordHasher,
};
pub use authorization_service::{
    AuthorizationService, BootstrapReport, PermissionDraft, RoleDraft,
};
pub use clock::{Clock, SystemClock};
pub use rbac_ports::{
    CreatePermissionInput, CreateRoleInput, PageRequest, PermissionRepository,
    RolePermissionRepository, RoleRepository, UpdatePermissionInput, UpdateRoleInput,
    UserRoleRepository,
};
pub use token_ports::{
    BEARER_TOKEN_TYPE, TokenClaims, TokenError, TokenManager, TokenPair, TokenSubject,
    into_app_result, token_fingerprint,
};
