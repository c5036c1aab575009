//! Planned material lines, returned items and event consumables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{ReturnCondition, SupplyStatus};

/// Planned material line of an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlannedMaterial {
    pub id: i32,
    pub event_id: i32,
    pub equipment_id: Option<i32>,
    /// Model of the linked equipment
    pub equipment_model: Option<String>,
    /// Free text for lines without equipment
    pub description: Option<String>,
    /// Planned quantity
    pub quantity: i32,
    /// Quantity checked out of the warehouse
    pub quantity_out: i32,
    pub reviewed: bool,
    pub supply_status: SupplyStatus,
    /// Units returned in good condition
    pub returned_ok: i64,
    /// Units returned defective, broken or lost
    pub returned_damaged: i64,
}

impl PlannedMaterial {
    pub fn label(&self) -> String {
        self.equipment_model
            .clone()
            .or_else(|| self.description.clone())
            .unwrap_or_else(|| format!("Line #{}", self.id))
    }

    pub fn returned(&self) -> i64 {
        self.returned_ok + self.returned_damaged
    }
}

/// Material line with its return records
#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialDetails {
    #[serde(flatten)]
    pub material: PlannedMaterial,
    pub returns: Vec<ReturnedItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaterial {
    pub equipment_id: Option<i32>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterial {
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: Option<i32>,
}

/// Resolution chosen for a pending shortage
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveShortage {
    pub solution: Option<SupplyStatus>,
}

/// Check-in record for a material line
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReturnedItem {
    pub id: i32,
    pub material_id: i32,
    pub quantity: i32,
    pub condition: ReturnCondition,
    pub note: Option<String>,
    pub returned_at: DateTime<Utc>,
}

/// Consumable planned for an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventConsumable {
    pub id: i32,
    pub event_id: i32,
    pub consumable_id: i32,
    pub consumable_name: String,
    pub unit: String,
    pub quantity: i32,
    pub reviewed: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventConsumable {
    pub consumable_id: i32,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventConsumable {
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
}
