use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use warden_core::AuthenticatedUser;

use crate::dto::{
    LoginRequest, LoginResponse, PermissionResponse, RefreshTokenRequest, RegisterRequest,
    TokenResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let identity = state
        .account_service
        .register(
            payload.username.as_str(),
            payload.email.as_str(),
            payload.password.as_str(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(identity))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .account_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(LoginResponse::from(outcome)))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = state
        .account_service
        .refresh(payload.refresh_token.as_str())?;

    Ok(Json(TokenResponse::from(tokens)))
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<UserResponse>> {
    let identity = state.account_service.current_user(user.user_id()).await?;

    Ok(Json(UserResponse::from(identity)))
}

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .authorization_service
        .get_user_permissions(user.user_id())
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}
