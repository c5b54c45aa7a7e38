//! City projects. Status defaults to `"active"` on creation.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateProjectRequest, Project, UpdateProjectRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "All projects, wrapped as {\"projects\": [...]}", body = [Project]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_projects(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_projects().await.map_err(repo_error("Failed to get projects"))?;
    Ok(Json(json!({ "projects": rows })))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Wrapped as {\"project\": {...}}", body = Project),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_project(id)
        .await
        .map_err(repo_error("Failed to get project"))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(json!({ "project": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"project\": {...}}", body = Project),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_project(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_project(req).await.map_err(repo_error("Failed to create project"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, project_id = row.id, "project created");
    Ok((StatusCode::CREATED, Json(json!({ "project": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    tag = "projects",
    params(("id" = i32, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"project\"", body = Project),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateProjectRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_project(id, req)
        .await
        .map_err(repo_error("Failed to update project"))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, project_id = row.id, "project updated");
    Ok(Json(json!({
        "message": "Project updated successfully",
        "project": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    tag = "projects",
    params(("id" = i32, Path, description = "Project id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_project(id).await.map_err(repo_error("Failed to delete project"))?;
    if !deleted {
        return Err(ApiError::not_found("Project not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, project_id = id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
