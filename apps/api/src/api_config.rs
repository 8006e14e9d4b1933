use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use warden_core::AppError;
use warden_infrastructure::{MIN_SECRET_LENGTH, PasswordHashConfig, TokenConfig};

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub token_config: TokenConfig,
    pub password_hash_config: PasswordHashConfig,
    pub password_hash_concurrency: usize,
    pub cors_allowed_origin: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parsed_env("API_PORT", 3001_u16)?;

        let secret = required_non_empty_env("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LENGTH} characters"
            )));
        }

        let access_ttl_seconds =
            positive_seconds("JWT_ACCESS_TTL_SECONDS", DEFAULT_ACCESS_TTL_SECONDS)?;
        let refresh_ttl_seconds =
            positive_seconds("JWT_REFRESH_TTL_SECONDS", DEFAULT_REFRESH_TTL_SECONDS)?;
        let issuer = env::var("JWT_ISSUER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "warden".to_owned());

        let defaults = PasswordHashConfig::default();
        let password_hash_config = PasswordHashConfig {
            memory_kib: parsed_env("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parsed_env("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parsed_env("ARGON2_PARALLELISM", defaults.parallelism)?,
            key_length: parsed_env("ARGON2_KEY_LENGTH", defaults.key_length)?,
        };

        let password_hash_concurrency = parsed_env("PASSWORD_HASH_CONCURRENCY", 4_usize)?;
        if password_hash_concurrency == 0 {
            return Err(AppError::Validation(
                "PASSWORD_HASH_CONCURRENCY must be greater than zero".to_owned(),
            ));
        }

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            token_config: TokenConfig {
                secret,
                access_ttl: chrono::Duration::seconds(access_ttl_seconds),
                refresh_ttl: chrono::Duration::seconds(refresh_ttl_seconds),
                issuer,
            },
            password_hash_config,
            password_hash_concurrency,
            cors_allowed_origin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let ip = IpAddr::from_str(self.api_host.as_str())
            .map_err(|error| AppError::Validation(format!("invalid API_HOST: {error}")))?;
        Ok(SocketAddr::from((ip, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_value(name, value.as_str()),
        _ => Ok(default),
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

fn positive_seconds(name: &str, default: i64) -> Result<i64, AppError> {
    let seconds = parsed_env(name, default)?;
    if seconds <= 0 {
        return Err(AppError::Validation(format!(
            "{name} must be a positive number of seconds"
        )));
    }

    Ok(seconds)
}
