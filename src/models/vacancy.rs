use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// Vacancy
///
/// An open position (`public.vacancies`). `salary` is free text so ranges and
/// "negotiable" can be stored as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Vacancy {
    pub id: i32,
    pub position: String,
    pub experience: String,
    pub salary: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateVacancyRequest {
    pub position: String,
    pub experience: String,
    pub salary: String,
}

impl Validate for CreateVacancyRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("position", &self.position)?;
        require_text("experience", &self.experience)?;
        require_text("salary", &self.salary)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateVacancyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
}

impl Validate for UpdateVacancyRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("position", self.position.as_ref())?;
        reject_blank("experience", self.experience.as_ref())?;
        reject_blank("salary", self.salary.as_ref())
    }
}
