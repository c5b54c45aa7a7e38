use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateEvacuationRequest, Evacuation, UpdateEvacuationRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/evacuations",
    tag = "evacuations",
    responses(
        (status = 200, description = "All evacuations, wrapped as {\"evacuations\": [...]}", body = [Evacuation]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_evacuations(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_evacuations().await.map_err(repo_error("Failed to get evacuations"))?;
    Ok(Json(json!({ "evacuations": rows })))
}

#[utoipa::path(
    get,
    path = "/api/evacuations/{id}",
    tag = "evacuations",
    params(("id" = i32, Path, description = "Evacuation id")),
    responses(
        (status = 200, description = "Wrapped as {\"evacuation\": {...}}", body = Evacuation),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Evacuation not found")
    )
)]
pub async fn get_evacuation(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_evacuation(id)
        .await
        .map_err(repo_error("Failed to get evacuation"))?
        .ok_or_else(|| ApiError::not_found("Evacuation not found"))?;
    Ok(Json(json!({ "evacuation": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/evacuations",
    tag = "evacuations",
    request_body = CreateEvacuationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"evacuation\": {...}}", body = Evacuation),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_evacuation(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateEvacuationRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_evacuation(req).await.map_err(repo_error("Failed to create evacuation"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_id = row.id, "evacuation created");
    Ok((StatusCode::CREATED, Json(json!({ "evacuation": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/evacuations/{id}",
    tag = "evacuations",
    params(("id" = i32, Path, description = "Evacuation id")),
    request_body = UpdateEvacuationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"evacuation\"", body = Evacuation),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Evacuation not found")
    )
)]
pub async fn update_evacuation(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateEvacuationRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_evacuation(id, req)
        .await
        .map_err(repo_error("Failed to update evacuation"))?
        .ok_or_else(|| ApiError::not_found("Evacuation not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_id = row.id, "evacuation updated");
    Ok(Json(json!({
        "message": "Evacuation updated successfully",
        "evacuation": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/evacuations/{id}",
    tag = "evacuations",
    params(("id" = i32, Path, description = "Evacuation id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Evacuation not found")
    )
)]
pub async fn delete_evacuation(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_evacuation(id).await.map_err(repo_error("Failed to delete evacuation"))?;
    if !deleted {
        return Err(ApiError::not_found("Evacuation not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, evacuation_id = id, "evacuation deleted");
    Ok(StatusCode::NO_CONTENT)
}
