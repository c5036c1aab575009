//! Consumable model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ConsumableCategory;

/// Consumable supply (tape, fasteners, connectors)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Consumable {
    pub id: i32,
    pub name: String,
    pub category: ConsumableCategory,
    /// Unit of measure ("unit", "roll", "box")
    pub unit: String,
    pub quantity_in_stock: i32,
}

/// Create consumable request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConsumable {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub category: Option<ConsumableCategory>,
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub quantity_in_stock: Option<i32>,
}

/// Update consumable request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateConsumable {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub category: Option<ConsumableCategory>,
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub quantity_in_stock: Option<i32>,
}
