use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// Project
///
/// A city improvement project (`public.projects`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateProjectRequest {
    pub fn status_or_default(&self) -> String {
        match self.status.as_deref().map(str::trim) {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => DEFAULT_PROJECT_STATUS.to_string(),
        }
    }
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("category", &self.category)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("title", self.title.as_ref())?;
        reject_blank("description", self.description.as_ref())?;
        reject_blank("category", self.category.as_ref())?;
        reject_blank("status", self.status.as_ref())
    }
}
