use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .authorization_service
        .list_roles(PageRequest::from(query))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .authorization_service
        .create_role(RoleDraft {
            name: payload.name,
            display_name: payload.display_name,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .authorization_service
        .delete_role(RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
