//! Monthly fine reports: violations, enforcement orders, amounts issued and collected.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateFineRequest, Fine, UpdateFineRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/fines",
    tag = "fines",
    responses(
        (status = 200, description = "All fines, wrapped as {\"fines\": [...]}", body = [Fine]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_fines(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_fines().await.map_err(repo_error("Failed to get fines"))?;
    Ok(Json(json!({ "fines": rows })))
}

#[utoipa::path(
    get,
    path = "/api/fines/{id}",
    tag = "fines",
    params(("id" = i32, Path, description = "Fine id")),
    responses(
        (status = 200, description = "Wrapped as {\"fine\": {...}}", body = Fine),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn get_fine(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_fine(id)
        .await
        .map_err(repo_error("Failed to get fine"))?
        .ok_or_else(|| ApiError::not_found("Fine not found"))?;
    Ok(Json(json!({ "fine": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/fines",
    tag = "fines",
    request_body = CreateFineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"fine\": {...}}", body = Fine),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_fine(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateFineRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_fine(req).await.map_err(repo_error("Failed to create fine"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, fine_id = row.id, "fine created");
    Ok((StatusCode::CREATED, Json(json!({ "fine": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/fines/{id}",
    tag = "fines",
    params(("id" = i32, Path, description = "Fine id")),
    request_body = UpdateFineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"fine\"", body = Fine),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn update_fine(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateFineRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_fine(id, req)
        .await
        .map_err(repo_error("Failed to update fine"))?
        .ok_or_else(|| ApiError::not_found("Fine not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, fine_id = row.id, "fine updated");
    Ok(Json(json!({
        "message": "Fine updated successfully",
        "fine": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/fines/{id}",
    tag = "fines",
    params(("id" = i32, Path, description = "Fine id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn delete_fine(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_fine(id).await.map_err(repo_error("Failed to delete fine"))?;
    if !deleted {
        return Err(ApiError::not_found("Fine not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, fine_id = id, "fine deleted");
    Ok(StatusCode::NO_CONTENT)
}
