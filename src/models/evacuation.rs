use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extract::{Validate, reject_blank, require_text},
};

/// Evacuation
///
/// Tow-truck activity for one reporting date (`public.evacuations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Evacuation {
    pub id: i32,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub evacuators_count: i32,
    pub trips_count: i32,
    pub evacuations_count: i32,
    pub fine_lot_income: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateEvacuationRequest {
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub evacuators_count: i32,
    pub trips_count: i32,
    pub evacuations_count: i32,
    pub fine_lot_income: i32,
}

impl Validate for CreateEvacuationRequest {}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateEvacuationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evacuators_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trips_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evacuations_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_lot_income: Option<i32>,
}

impl Validate for UpdateEvacuationRequest {}

/// EvacuationRoute
///
/// A published tow route for a given month (`public.evacuation_routes`). `month` is free
/// text as entered by editors, e.g. "March".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct EvacuationRoute {
    pub id: i32,
    pub year: i32,
    pub month: String,
    pub route: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateEvacuationRouteRequest {
    pub year: i32,
    pub month: String,
    pub route: String,
}

impl Validate for CreateEvacuationRouteRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("month", &self.month)?;
        require_text("route", &self.route)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateEvacuationRouteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl Validate for UpdateEvacuationRouteRequest {
    fn validate(&self) -> Result<(), ApiError> {
        reject_blank("month", self.month.as_ref())?;
        reject_blank("route", self.route.as_ref())
    }
}
