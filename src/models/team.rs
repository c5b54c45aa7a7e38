use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// TeamMember
///
/// A staff profile shown on the public "our team" page (`public.team`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct TeamMember {
    pub id: i32,
    pub name: String,
    pub position: String,
    pub experience: String,
    pub photo_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTeamMemberRequest {
    pub name: String,
    pub position: String,
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Validate for CreateTeamMemberRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("position", &self.position)?;
        require_text("experience", &self.experience)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateTeamMemberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    /// Absent leaves the stored URL alone; `null` clears it.
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
}

impl Validate for UpdateTeamMemberRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("name", self.name.as_ref())?;
        reject_blank("position", self.position.as_ref())?;
        reject_blank("experience", self.experience.as_ref())
    }
}
