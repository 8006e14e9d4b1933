//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_identity_repository;
mod in_memory_rbac_repository;
mod jwt_token_manager;
mod postgres_identity_repository;
mod postgres_rbac_repository;

pub use argon2_password_hasher::{Argon2PasswordHasher, PasswordHashConfig};
pub use in_memory_identity_repository::InMemoryIdentityRepository;
pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use jwt_token_manager::{JwtTokenManager, MIN_SECRET_LENGTH, TokenConfig};
pub use postgres_identity_repository::PostgresIdentityRepository;
pub use postgres_rbac_repository::PostgresRbacRepository;
