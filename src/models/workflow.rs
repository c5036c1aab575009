//! Request payloads of the event workflow actions

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use super::enums::ReturnCondition;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DepartureItem {
    pub material_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DepartureRequest {
    #[serde(default)]
    pub items: Vec<DepartureItem>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReturnItem {
    pub material_id: i32,
    pub quantity: i32,
    pub condition: ReturnCondition,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    #[serde(default)]
    pub items: Vec<ReturnItem>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReinforcementItem {
    pub equipment_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReinforcementRequest {
    #[serde(default)]
    pub items: Vec<ReinforcementItem>,
}

/// Send the list back to planning
#[derive(Debug, Deserialize, ToSchema)]
pub struct CorrectionRequest {
    pub note: Option<String>,
}

/// Cancellation requires the administrator password again
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelRequest {
    pub reason: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CloneRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub name: Option<String>,
}
