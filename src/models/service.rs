use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// Service
///
/// A municipal service offered to residents (`public.services`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Service {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub category: String,
    pub icon_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateServiceRequest {
    pub title: String,
    pub description: String,
    pub price: i32,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Validate for CreateServiceRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("category", &self.category)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Absent leaves the stored URL alone; `null` clears it.
    #[serde(
        default,
        deserialize_with = "super::explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    #[schema(value_type = Option<String>)]
    pub icon_url: Option<Option<String>>,
}

impl Validate for UpdateServiceRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("title", self.title.as_ref())?;
        reject_blank("description", self.description.as_ref())?;
        reject_blank("category", self.category.as_ref())
    }
}
