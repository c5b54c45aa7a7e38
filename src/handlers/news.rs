//! News articles. The publication date is stamped on creation and never changes.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateNewsRequest, News, UpdateNewsRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses(
        (status = 200, description = "All news, wrapped as {\"news\": [...]}", body = [News]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_news(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_news().await.map_err(repo_error("Failed to get news"))?;
    Ok(Json(json!({ "news": rows })))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "news",
    params(("id" = i32, Path, description = "News id")),
    responses(
        (status = 200, description = "Wrapped as {\"news\": {...}}", body = News),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "News not found")
    )
)]
pub async fn get_news(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_news(id)
        .await
        .map_err(repo_error("Failed to get news"))?
        .ok_or_else(|| ApiError::not_found("News not found"))?;
    Ok(Json(json!({ "news": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/news",
    tag = "news",
    request_body = CreateNewsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"news\": {...}}", body = News),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_news(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateNewsRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_news(req).await.map_err(repo_error("Failed to create news"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, news_id = row.id, "news created");
    Ok((StatusCode::CREATED, Json(json!({ "news": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/news/{id}",
    tag = "news",
    params(("id" = i32, Path, description = "News id")),
    request_body = UpdateNewsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"news\"", body = News),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "News not found")
    )
)]
pub async fn update_news(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateNewsRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_news(id, req)
        .await
        .map_err(repo_error("Failed to update news"))?
        .ok_or_else(|| ApiError::not_found("News not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, news_id = row.id, "news updated");
    Ok(Json(json!({
        "message": "News updated successfully",
        "news": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/news/{id}",
    tag = "news",
    params(("id" = i32, Path, description = "News id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "News not found")
    )
)]
pub async fn delete_news(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_news(id).await.map_err(repo_error("Failed to delete news"))?;
    if !deleted {
        return Err(ApiError::not_found("News not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, news_id = id, "news deleted");
    Ok(StatusCode::NO_CONTENT)
}
