use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use warden_core::AppError;

pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(allowed_origin).map_err(|error| {
                AppError::Validation(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
            })?,
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
