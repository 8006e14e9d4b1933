use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .authorization_service
        .list_permissions(PageRequest::from(query))
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}
