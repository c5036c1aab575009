//! Maintenance records and their status history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::MaintenanceStatus;

/// One unit of equipment under maintenance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub equipment_id: i32,
    pub equipment_model: String,
    /// Return record that opened this maintenance, if any
    pub returned_item_id: Option<i32>,
    pub event_id: Option<i32>,
    pub event_name: Option<String>,
    pub status: MaintenanceStatus,
    pub problem_description: String,
    pub solution: Option<String>,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceHistory {
    pub id: i32,
    pub record_id: i32,
    pub previous_status: MaintenanceStatus,
    pub new_status: MaintenanceStatus,
    pub note: Option<String>,
    pub user_id: Option<i32>,
    pub user_login: Option<String>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceDetails {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub history: Vec<MaintenanceHistory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMaintenanceStatus {
    pub status: Option<MaintenanceStatus>,
    pub solution: Option<String>,
    /// Free text kept in the history row
    pub note: Option<String>,
}
