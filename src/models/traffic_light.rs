use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// Status given to a traffic light created without one.
pub const DEFAULT_TRAFFIC_LIGHT_STATUS: &str = "active";

/// TrafficLight
///
/// A signalised installation (`public.traffic_lights`). Only rows whose `status` is
/// `"active"` count towards the dashboard total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct TrafficLight {
    pub id: i32,
    pub address: String,
    pub light_type: String,
    pub install_year: i32,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateTrafficLightRequest {
    pub address: String,
    pub light_type: String,
    pub install_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateTrafficLightRequest {
    /// The status to store: the supplied one, or the default when absent or blank.
    pub fn status_or_default(&self) -> String {
        match self.status.as_deref().map(str::trim) {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => DEFAULT_TRAFFIC_LIGHT_STATUS.to_string(),
        }
    }
}

impl Validate for CreateTrafficLightRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("address", &self.address)?;
        require_text("light_type", &self.light_type)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateTrafficLightRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Validate for UpdateTrafficLightRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("address", self.address.as_ref())?;
        reject_blank("light_type", self.light_type.as_ref())?;
        reject_blank("status", self.status.as_ref())
    }
}
