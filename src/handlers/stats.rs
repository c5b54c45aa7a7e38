use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    error::ApiResult,
    models::{DashboardStats, TrafficSummary},
    repository::RepositoryState,
};

/// Liveness probe. Does not touch the database.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// get_stats
///
/// Dashboard headline figures, wrapped as `{"stats": {...}}`.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "aggregates",
    responses(
        (status = 200, description = "Latest report figures", body = DashboardStats),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_stats(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let stats = repo.get_stats().await.map_err(repo_error("Failed to get stats"))?;
    Ok(Json(json!({ "stats": stats })))
}

#[utoipa::path(
    get,
    path = "/api/traffic",
    tag = "aggregates",
    responses(
        (status = 200, description = "Traffic light counts, wrapped as {\"traffic\": {...}}", body = TrafficSummary),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_traffic(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let traffic = repo
        .get_traffic()
        .await
        .map_err(repo_error("Failed to get traffic"))?;
    Ok(Json(json!({ "traffic": traffic })))
}
