use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateEvacuationRouteRequest, EvacuationRoute, UpdateEvacuationRouteRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/evacuation-routes",
    tag = "evacuation_routes",
    responses(
        (status = 200, description = "All evacuation routes, wrapped as {\"evacuation_routes\": [...]}", body = [EvacuationRoute]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_evacuation_routes(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_evacuation_routes().await.map_err(repo_error("Failed to get evacuation routes"))?;
    Ok(Json(json!({ "evacuation_routes": rows })))
}

#[utoipa::path(
    get,
    path = "/api/evacuation-routes/{id}",
    tag = "evacuation_routes",
    params(("id" = i32, Path, description = "Evacuation route id")),
    responses(
        (status = 200, description = "Wrapped as {\"evacuation_route\": {...}}", body = EvacuationRoute),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Evacuation route not found")
    )
)]
pub async fn get_evacuation_route(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_evacuation_route(id)
        .await
        .map_err(repo_error("Failed to get evacuation route"))?
        .ok_or_else(|| ApiError::not_found("Evacuation route not found"))?;
    Ok(Json(json!({ "evacuation_route": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/evacuation-routes",
    tag = "evacuation_routes",
    request_body = CreateEvacuationRouteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"evacuation_route\": {...}}", body = EvacuationRoute),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_evacuation_route(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateEvacuationRouteRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_evacuation_route(req).await.map_err(repo_error("Failed to create evacuation route"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_route_id = row.id, "evacuation route created");
    Ok((StatusCode::CREATED, Json(json!({ "evacuation_route": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/evacuation-routes/{id}",
    tag = "evacuation_routes",
    params(("id" = i32, Path, description = "Evacuation route id")),
    request_body = UpdateEvacuationRouteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"evacuation_route\"", body = EvacuationRoute),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Evacuation route not found")
    )
)]
pub async fn update_evacuation_route(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateEvacuationRouteRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_evacuation_route(id, req)
        .await
        .map_err(repo_error("Failed to update evacuation route"))?
        .ok_or_else(|| ApiError::not_found("Evacuation route not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_route_id = row.id, "evacuation route updated");
    Ok(Json(json!({
        "message": "Evacuation route updated successfully",
        "evacuation_route": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/evacuation-routes/{id}",
    tag = "evacuation_routes",
    params(("id" = i32, Path, description = "Evacuation route id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Evacuation route not found")
    )
)]
pub async fn delete_evacuation_route(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_evacuation_route(id).await.map_err(repo_error("Failed to delete evacuation route"))?;
    if !deleted {
        return Err(ApiError::not_found("Evacuation route not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_route_id = id, "evacuation route deleted");
    Ok(StatusCode::NO_CONTENT)
}
