mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;
use warden_core::AppError;

use crate::middleware::{AccessGuard, AccessRequirement};
use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, cors_origin: Option<&str>) -> Result<Router, AppError> {
    let router = routes(app_state).layer(TraceLayer::new_for_http());

    Ok(match cors_origin {
        Some(origin) => router.layer(cors::build_cors_layer(origin)?),
        None => router,
    })
}

/// Route table without transport layers.
pub(crate) fn routes(app_state: AppState) -> Router {
    let authorization_service = app_state.authorization_service.clone();
    let guard = move |requirement: AccessRequirement| {
        from_fn_with_state(
            AccessGuard::new(authorization_service.clone(), requirement),
            middleware::require_access,
        )
    };

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me_handler))
        .route(
            "/api/auth/me/permissions",
            get(handlers::auth::my_permissions_handler),
        )
        .route(
            "/api/roles",
            get(handlers::security::list_roles_handler)
                .route_layer(guard(AccessRequirement::permission("role", "read")))
                .merge(
                    post(handlers::security::create_role_handler)
                        .route_layer(guard(AccessRequirement::permission("role", "write"))),
                ),
        )
        .route(
            "/api/roles/{role_id}",
            delete(handlers::security::delete_role_handler)
                .route_layer(guard(AccessRequirement::permission("role", "delete"))),
        )
        .route(
            "/api/permissions",
            get(handlers::security::list_permissions_handler)
                .route_layer(guard(AccessRequirement::permission("permission", "read"))),
        )
        .route(
            "/api/users/{user_id}/roles/{role_id}",
            post(handlers::security::assign_user_role_handler)
                .merge(delete(handlers::security::remove_user_role_handler))
                .route_layer(guard(AccessRequirement::admin())),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_bearer_auth,
        ));

    let public_routes = Router::new()
        .route(
            "/api/health",
            get(handlers::health::health_handler).route_layer(from_fn_with_state(
                app_state.clone(),
                middleware::optional_bearer_auth,
            )),
        )
        .route("/api/auth/register", post(handlers::auth::register_handler))
        .route("/api/auth/login", post(handlers::auth::login_handler))
        .route("/api/auth/refresh", post(handlers::auth::refresh_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
