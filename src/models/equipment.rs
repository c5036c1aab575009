//! Equipment model (rental inventory with stock counters)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::EquipmentCategory;

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub model: String,
    pub manufacturer: Option<String>,
    pub category: EquipmentCategory,
    /// Units available in the warehouse
    pub quantity_in_stock: i32,
    /// Units currently under maintenance
    pub quantity_in_maintenance: i32,
    /// Unit weight in kilograms
    pub weight: Option<f64>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    pub manufacturer: Option<String>,
    pub category: Option<EquipmentCategory>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub quantity_in_stock: Option<i32>,
    #[validate(range(min = 0, message = "Maintenance quantity cannot be negative"))]
    pub quantity_in_maintenance: Option<i32>,
    pub weight: Option<f64>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Model cannot be empty"))]
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<EquipmentCategory>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub quantity_in_stock: Option<i32>,
    #[validate(range(min = 0, message = "Maintenance quantity cannot be negative"))]
    pub quantity_in_maintenance: Option<i32>,
    pub weight: Option<f64>,
}

/// Query parameters for the equipment list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Matches model or manufacturer (case-insensitive)
    pub search: Option<String>,
    pub category: Option<EquipmentCategory>,
}

/// Send units from stock to maintenance
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendToMaintenance {
    pub quantity: i32,
    pub problem_description: Option<String>,
}

/// Bring units back from maintenance to stock
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnFromMaintenance {
    pub quantity: i32,
}
