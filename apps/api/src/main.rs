//! Warden API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use warden_application::{AccountService, AuthorizationService, SystemClock, TokenManager};
use warden_core::AppError;
use warden_infrastructure::{
    Argon2PasswordHasher, JwtTokenManager, PostgresIdentityRepository, PostgresRbacRepository,
};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let rbac_repository = Arc::new(PostgresRbacRepository::new(pool.clone()));
    let authorization_service = AuthorizationService::new(
        rbac_repository.clone(),
        rbac_repository.clone(),
        rbac_repository.clone(),
        rbac_repository,
    );

    authorization_service.initialize_system_data().await?;

    let token_manager: Arc<dyn TokenManager> = Arc::new(JwtTokenManager::new(
        config.token_config.clone(),
        Arc::new(SystemClock),
    )?);
    let password_hasher = Arc::new(Argon2PasswordHasher::new(config.password_hash_config)?);
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pool));

    let account_service = AccountService::new(
        identity_repository,
        password_hasher,
        token_manager.clone(),
        authorization_service.clone(),
        config.password_hash_concurrency,
    );

    let app_state = AppState {
        authorization_service,
        account_service,
        token_manager,
    };

    let app = api_router::build_router(app_state, config.cors_allowed_origin.as_deref())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "warden api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server failed: {error}")))
}
