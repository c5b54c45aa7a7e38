use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::extract::Validate;

/// Fine
///
/// One reporting period of traffic-violation enforcement figures (`public.fines`).
/// Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Fine {
    pub id: i32,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub violations_total: i32,
    pub orders_total: i32,
    pub fines_amount_total: i32,
    pub collected_amount_total: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateFineRequest {
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub violations_total: i32,
    pub orders_total: i32,
    pub fines_amount_total: i32,
    pub collected_amount_total: i32,
}

impl Validate for CreateFineRequest {}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateFineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fines_amount_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_amount_total: Option<i32>,
}

impl Validate for UpdateFineRequest {}
