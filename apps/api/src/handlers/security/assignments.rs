use super::*;

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedUser>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .assign_role_to_user(
            UserId::new(user_id),
            RoleId::new(role_id),
            admin.user_id(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_user_role_handler(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .remove_role_from_user(UserId::new(user_id), RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
