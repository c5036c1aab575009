//! Event model (rental, sublease or loan operation)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    addendum::AddendumDetails,
    attendance::AttendanceConfirmation,
    client::Client,
    enums::{EventStatus, EventType, PowerType, VehicleAccess},
    material::{EventConsumable, MaterialDetails},
    photo::Photo,
    staff::Staff,
    vehicle::Vehicle,
};

/// Event header record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i32,
    pub status: EventStatus,
    pub event_type: EventType,
    pub name: Option<String>,
    pub location: Option<String>,
    pub client_id: i32,
    pub site_contact_name: Option<String>,
    pub site_contact_phone: Option<String>,
    pub assembly_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Note left by logistics when the list was sent back
    pub correction_note: Option<String>,
    pub power_type: Option<PowerType>,
    /// Distance to the power supply, in meters
    pub power_distance_m: i32,
    pub vehicle_access: Option<VehicleAccess>,
    pub needs_generator: bool,
    pub technical_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_by: Option<i32>,
    pub team_leader_id: Option<i32>,
}

impl Event {
    /// Name used in documents and messages
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Operation #{}", self.id),
        }
    }
}

/// Event row for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventShort {
    pub id: i32,
    pub status: EventStatus,
    pub event_type: EventType,
    pub name: Option<String>,
    pub location: Option<String>,
    pub client_id: i32,
    pub client_company: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Create event request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    pub event_type: Option<EventType>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub client_id: i32,
    pub site_contact_name: Option<String>,
    pub site_contact_phone: Option<String>,
    pub assembly_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub power_type: Option<PowerType>,
    #[validate(range(min = 0, message = "Power distance cannot be negative"))]
    pub power_distance_m: Option<i32>,
    pub vehicle_access: Option<VehicleAccess>,
    pub needs_generator: Option<bool>,
    pub technical_notes: Option<String>,
    pub team_leader_id: Option<i32>,
}

/// Update event request (only while planning)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    pub event_type: Option<EventType>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub client_id: Option<i32>,
    pub site_contact_name: Option<String>,
    pub site_contact_phone: Option<String>,
    pub assembly_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub power_type: Option<PowerType>,
    #[validate(range(min = 0, message = "Power distance cannot be negative"))]
    pub power_distance_m: Option<i32>,
    pub vehicle_access: Option<VehicleAccess>,
    pub needs_generator: Option<bool>,
    pub technical_notes: Option<String>,
    pub team_leader_id: Option<i32>,
}

/// Query parameters for events
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub client_id: Option<i32>,
    /// Earliest start date (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest start date (inclusive)
    pub to: Option<NaiveDate>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

/// Full event aggregate
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub client: Client,
    pub team_leader: Option<Staff>,
    pub crew: Vec<Staff>,
    pub vehicles: Vec<Vehicle>,
    pub materials: Vec<MaterialDetails>,
    pub consumables: Vec<EventConsumable>,
    pub photos: Vec<Photo>,
    pub attendance: Vec<AttendanceConfirmation>,
    pub addenda: Vec<AddendumDetails>,
    /// Any returned item in a condition other than good
    pub has_damage: bool,
}

/// Replace the crew roster
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCrew {
    pub staff_ids: Option<Vec<i32>>,
}

/// Replace the vehicle assignment
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetVehicles {
    pub vehicle_ids: Option<Vec<i32>>,
}
