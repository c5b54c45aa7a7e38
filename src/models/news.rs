use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// News
///
/// A published article (`public.news`). `date` is the publication time, stamped by the
/// server when the article is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct News {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub tag: String,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Validate for CreateNewsRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        require_text("tag", &self.tag)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateNewsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Validate for UpdateNewsRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("title", self.title.as_ref())?;
        reject_blank("content", self.content.as_ref())?;
        reject_blank("tag", self.tag.as_ref())
    }
}
