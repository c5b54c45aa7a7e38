use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateVacancyRequest, UpdateVacancyRequest, Vacancy},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/vacancies",
    tag = "vacancies",
    responses(
        (status = 200, description = "All vacancies, wrapped as {\"vacancies\": [...]}", body = [Vacancy]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_vacancies(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_vacancies().await.map_err(repo_error("Failed to get vacancies"))?;
    Ok(Json(json!({ "vacancies": rows })))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    tag = "vacancies",
    params(("id" = i32, Path, description = "Vacancy id")),
    responses(
        (status = 200, description = "Wrapped as {\"vacancy\": {...}}", body = Vacancy),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Vacancy not found")
    )
)]
pub async fn get_vacancy(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_vacancy(id)
        .await
        .map_err(repo_error("Failed to get vacancy"))?
        .ok_or_else(|| ApiError::not_found("Vacancy not found"))?;
    Ok(Json(json!({ "vacancy": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/vacancies",
    tag = "vacancies",
    request_body = CreateVacancyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"vacancy\": {...}}", body = Vacancy),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_vacancy(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateVacancyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_vacancy(req).await.map_err(repo_error("Failed to create vacancy"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, vacancy_id = row.id, "vacancy created");
    Ok((StatusCode::CREATED, Json(json!({ "vacancy": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/vacancies/{id}",
    tag = "vacancies",
    params(("id" = i32, Path, description = "Vacancy id")),
    request_body = UpdateVacancyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"vacancy\"", body = Vacancy),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Vacancy not found")
    )
)]
pub async fn update_vacancy(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateVacancyRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_vacancy(id, req)
        .await
        .map_err(repo_error("Failed to update vacancy"))?
        .ok_or_else(|| ApiError::not_found("Vacancy not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, vacancy_id = row.id, "vacancy updated");
    Ok(Json(json!({
        "message": "Vacancy updated successfully",
        "vacancy": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/vacancies/{id}",
    tag = "vacancies",
    params(("id" = i32, Path, description = "Vacancy id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Vacancy not found")
    )
)]
pub async fn delete_vacancy(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_vacancy(id).await.map_err(repo_error("Failed to delete vacancy"))?;
    if !deleted {
        return Err(ApiError::not_found("Vacancy not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, vacancy_id = id, "vacancy deleted");
    Ok(StatusCode::NO_CONTENT)
}
