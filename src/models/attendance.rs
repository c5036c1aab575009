//! Crew attendance confirmations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::AttendanceParty;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceConfirmation {
    pub id: i32,
    pub event_id: i32,
    pub staff_id: i32,
    pub staff_name: String,
    pub confirmed_by_leader: bool,
    pub confirmed_by_member: bool,
    pub leader_confirmed_at: Option<DateTime<Utc>>,
    pub member_confirmed_at: Option<DateTime<Utc>>,
    /// Both the leader and the member confirmed
    pub presence_confirmed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmAttendance {
    pub staff_id: i32,
    #[serde(rename = "as")]
    pub party: AttendanceParty,
}
