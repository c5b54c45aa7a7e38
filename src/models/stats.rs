use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{Evacuation, Fine};

/// DashboardStats
///
/// Headline figures for the public dashboard: the most recent fine and evacuation reports
/// plus the number of traffic lights currently in service. A figure group is omitted
/// entirely when its source table is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations_total: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders_total: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fines_amount_total: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_amount_total: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evacuators_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trips_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evacuations_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_lot_income: Option<i32>,

    #[ts(type = "number")]
    pub traffic_lights_active: i64,
}

impl DashboardStats {
    pub fn from_latest(
        fine: Option<&Fine>,
        evacuation: Option<&Evacuation>,
        traffic_lights_active: i64,
    ) -> Self {
        let mut stats = Self {
            traffic_lights_active,
            ..Self::default()
        };

        if let Some(fine) = fine {
            stats.violations_total = Some(fine.violations_total);
            stats.orders_total = Some(fine.orders_total);
            stats.fines_amount_total = Some(fine.fines_amount_total);
            stats.collected_amount_total = Some(fine.collected_amount_total);
        }

        if let Some(evacuation) = evacuation {
            stats.evacuators_count = Some(evacuation.evacuators_count);
            stats.trips_count = Some(evacuation.trips_count);
            stats.evacuations_count = Some(evacuation.evacuations_count);
            stats.fine_lot_income = Some(evacuation.fine_lot_income);
        }

        stats
    }
}

/// TrafficSummary
///
/// Traffic-light counts grouped by `light_type` and by `install_year`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TrafficSummary {
    #[schema(value_type = Object)]
    #[ts(type = "Record<string, number>")]
    pub light_types: BTreeMap<String, i64>,
    #[schema(value_type = Object)]
    #[ts(type = "Record<number, number>")]
    pub install_years: BTreeMap<i32, i64>,
}
