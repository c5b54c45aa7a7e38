//! Traffic light registry. A light created without a status starts out `"active"`.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateTrafficLightRequest, TrafficLight, UpdateTrafficLightRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/traffic-lights",
    tag = "traffic_lights",
    responses(
        (status = 200, description = "All traffic lights, wrapped as {\"traffic_lights\": [...]}", body = [TrafficLight]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_traffic_lights(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_traffic_lights().await.map_err(repo_error("Failed to get traffic lights"))?;
    Ok(Json(json!({ "traffic_lights": rows })))
}

#[utoipa::path(
    get,
    path = "/api/traffic-lights/{id}",
    tag = "traffic_lights",
    params(("id" = i32, Path, description = "Traffic light id")),
    responses(
        (status = 200, description = "Wrapped as {\"traffic_light\": {...}}", body = TrafficLight),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Traffic light not found")
    )
)]
pub async fn get_traffic_light(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_traffic_light(id)
        .await
        .map_err(repo_error("Failed to get traffic light"))?
        .ok_or_else(|| ApiError::not_found("Traffic light not found"))?;
    Ok(Json(json!({ "traffic_light": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/traffic-lights",
    tag = "traffic_lights",
    request_body = CreateTrafficLightRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"traffic_light\": {...}}", body = TrafficLight),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_traffic_light(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateTrafficLightRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_traffic_light(req).await.map_err(repo_error("Failed to create traffic light"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, traffic_light_id = row.id, "traffic light created");
    Ok((StatusCode::CREATED, Json(json!({ "traffic_light": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/traffic-lights/{id}",
    tag = "traffic_lights",
    params(("id" = i32, Path, description = "Traffic light id")),
    request_body = UpdateTrafficLightRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"traffic_light\"", body = TrafficLight),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Traffic light not found")
    )
)]
pub async fn update_traffic_light(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateTrafficLightRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_traffic_light(id, req)
        .await
        .map_err(repo_error("Failed to update traffic light"))?
        .ok_or_else(|| ApiError::not_found("Traffic light not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, traffic_light_id = row.id, "traffic light updated");
    Ok(Json(json!({
        "message": "Traffic light updated successfully",
        "traffic_light": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/traffic-lights/{id}",
    tag = "traffic_lights",
    params(("id" = i32, Path, description = "Traffic light id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Traffic light not found")
    )
)]
pub async fn delete_traffic_light(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_traffic_light(id).await.map_err(repo_error("Failed to delete traffic light"))?;
    if !deleted {
        return Err(ApiError::not_found("Traffic light not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, traffic_light_id = id, "traffic light deleted");
    Ok(StatusCode::NO_CONTENT)
}
