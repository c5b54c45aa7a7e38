use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateServiceRequest, Service, UpdateServiceRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "services",
    responses(
        (status = 200, description = "All services, wrapped as {\"services\": [...]}", body = [Service]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_services(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_services().await.map_err(repo_error("Failed to get services"))?;
    Ok(Json(json!({ "services": rows })))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Wrapped as {\"service\": {...}}", body = Service),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_service(id)
        .await
        .map_err(repo_error("Failed to get service"))?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;
    Ok(Json(json!({ "service": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/services",
    tag = "services",
    request_body = CreateServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"service\": {...}}", body = Service),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_service(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_service(req).await.map_err(repo_error("Failed to create service"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, service_id = row.id, "service created");
    Ok((StatusCode::CREATED, Json(json!({ "service": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    request_body = UpdateServiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"service\"", body = Service),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateServiceRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_service(id, req)
        .await
        .map_err(repo_error("Failed to update service"))?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, service_id = row.id, "service updated");
    Ok(Json(json!({
        "message": "Service updated successfully",
        "service": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_service(id).await.map_err(repo_error("Failed to delete service"))?;
    if !deleted {
        return Err(ApiError::not_found("Service not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, service_id = id, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}
