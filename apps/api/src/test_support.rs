use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use warden_application::{
    AccountService, AuthorizationService, Clock, IdentityRecord, TokenManager, TokenPair,
};
use warden_domain::SystemRole;
use warden_infrastructure::{
    Argon2PasswordHasher, InMemoryIdentityRepository, InMemoryRbacRepository, JwtTokenManager,
    PasswordHashConfig, TokenConfig,
};

use crate::state::AppState;

pub(crate) const TEST_PASSWORD: &str = "correct-horse-battery";

pub(crate) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(crate) fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Fully wired in-memory application used by router tests.
pub(crate) struct TestApp {
    pub(crate) state: AppState,
    pub(crate) clock: Arc<FixedClock>,
}

impl TestApp {
    pub(crate) async fn new() -> Self {
        let rbac = Arc::new(InMemoryRbacRepository::new());
        Self::with_authorization(AuthorizationService::new(
            rbac.clone(),
            rbac.clone(),
            rbac.clone(),
            rbac,
        ))
        .await
    }

    pub(crate) async fn with_authorization(authorization_service: AuthorizationService) -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let clock = Arc::new(FixedClock {
            now: Mutex::new(start),
        });

        let token_manager: Arc<dyn TokenManager> = Arc::new(
            JwtTokenManager::new(
                TokenConfig {
                    secret: "router-test-secret-with-enough-entropy".to_owned(),
                    access_ttl: Duration::minutes(15),
                    refresh_ttl: Duration::days(7),
                    issuer: "warden-test".to_owned(),
                },
                clock.clone(),
            )
            .unwrap_or_else(|error| panic!("token manager should build: {error}")),
        );
        let password_hasher = Arc::new(
            Argon2PasswordHasher::new(PasswordHashConfig {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
                key_length: 32,
            })
            .unwrap_or_else(|error| panic!("hasher should build: {error}")),
        );

        let bootstrap = authorization_service.initialize_system_data().await;
        assert!(bootstrap.is_ok());

        let account_service = AccountService::new(
            Arc::new(InMemoryIdentityRepository::new()),
            password_hasher,
            token_manager.clone(),
            authorization_service.clone(),
            2,
        );

        Self {
            state: AppState {
                authorization_service,
                account_service,
                token_manager,
            },
            clock,
        }
    }

    pub(crate) fn router(&self) -> Router {
        crate::api_router::routes(self.state.clone())
    }

    pub(crate) async fn register(&self, username: &str) -> IdentityRecord {
        self.state
            .account_service
            .register(
                username,
                format!("{username}@example.com").as_str(),
                TEST_PASSWORD,
            )
            .await
            .unwrap_or_else(|error| panic!("registration should succeed: {error}"))
    }

    pub(crate) async fn register_admin(&self, username: &str) -> IdentityRecord {
        let identity = self.register(username).await;
        let admin_role = self
            .state
            .authorization_service
            .get_role_by_name(SystemRole::Admin.as_str())
            .await
            .unwrap_or_else(|error| panic!("admin role should exist: {error}"));
        let assigned = self
            .state
            .authorization_service
            .assign_role_to_user(identity.id, admin_role.id, identity.id)
            .await;
        assert!(assigned.is_ok());

        identity
    }

    pub(crate) fn tokens_for(&self, identity: &IdentityRecord) -> TokenPair {
        self.state
            .token_manager
            .issue(&identity.token_subject())
            .unwrap_or_else(|error| panic!("token issue should succeed: {error}"))
    }
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub(crate) fn request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .unwrap_or_else(|error| panic!("request should build: {error}"))
}

/// Sends one request and decodes the JSON body (`Null` when empty).
pub(crate) async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .oneshot(request)
        .await
        .unwrap_or_else(|error| panic!("router should respond: {error}"));
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);

    (status, body)
}
