use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::repo_error;
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RecordId},
    models::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest},
    repository::RepositoryState,
};

#[utoipa::path(
    get,
    path = "/api/team",
    tag = "team",
    responses(
        (status = 200, description = "All team, wrapped as {\"team\": [...]}", body = [TeamMember]),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_team_members(State(repo): State<RepositoryState>) -> ApiResult<Json<Value>> {
    let rows = repo.list_team_members().await.map_err(repo_error("Failed to get team"))?;
    Ok(Json(json!({ "team": rows })))
}

#[utoipa::path(
    get,
    path = "/api/team/{id}",
    tag = "team",
    params(("id" = i32, Path, description = "Team member id")),
    responses(
        (status = 200, description = "Wrapped as {\"team_member\": {...}}", body = TeamMember),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn get_team_member(
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Value>> {
    let row = repo
        .get_team_member(id)
        .await
        .map_err(repo_error("Failed to get team member"))?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;
    Ok(Json(json!({ "team_member": row })))
}

#[utoipa::path(
    post,
    path = "/api/admin/team",
    tag = "team",
    request_body = CreateTeamMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created, wrapped as {\"team_member\": {...}}", body = TeamMember),
        (status = 400, description = "Malformed or incomplete body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn create_team_member(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    JsonBody(req): JsonBody<CreateTeamMemberRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let row = repo.create_team_member(req).await.map_err(repo_error("Failed to create team member"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, team_member_id = row.id, "team member created");
    Ok((StatusCode::CREATED, Json(json!({ "team_member": row }))))
}

#[utoipa::path(
    put,
    path = "/api/admin/team/{id}",
    tag = "team",
    params(("id" = i32, Path, description = "Team member id")),
    request_body = UpdateTeamMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated, wrapped with a message under \"team_member\"", body = TeamMember),
        (status = 400, description = "Invalid ID or body"),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn update_team_member(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
    JsonBody(req): JsonBody<UpdateTeamMemberRequest>,
) -> ApiResult<Json<Value>> {
    let row = repo
        .update_team_member(id, req)
        .await
        .map_err(repo_error("Failed to update team member"))?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;

    tracing::info!(user_id = actor.id, role = %actor.role, team_member_id = row.id, "team member updated");
    Ok(Json(json!({
        "message": "Team member updated successfully",
        "team_member": row,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/team/{id}",
    tag = "team",
    params(("id" = i32, Path, description = "Team member id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Team member not found")
    )
)]
pub async fn delete_team_member(
    actor: AuthUser,
    State(repo): State<RepositoryState>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    let deleted = repo.delete_team_member(id).await.map_err(repo_error("Failed to delete team member"))?;
    if !deleted {
        return Err(ApiError::not_found("Team member not found"));
    }

    tracing::info!(user_id = actor.id, role = %actor.role, team_member_id = id, "team member deleted");
    Ok(StatusCode::NO_CONTENT)
}
