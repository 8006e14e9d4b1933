use axum::Json;
use axum::extract::Extension;
use warden_core::AuthenticatedUser;

use crate::dto::HealthResponse;

pub async fn health_handler(user: Option<Extension<AuthenticatedUser>>) -> Json<HealthResponse> {
    let user_id = user.map(|Extension(user)| user.user_id().as_i64());

    Json(HealthResponse {
        status: "ok".to_owned(),
        authenticated: user_id.is_some(),
        user_id,
    })
}
