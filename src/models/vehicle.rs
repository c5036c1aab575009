//! Vehicle model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::VehicleStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    pub plate: String,
    /// Van, truck...
    pub kind: Option<String>,
    pub status: VehicleStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicle {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Plate is required"))]
    pub plate: String,
    pub kind: Option<String>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicle {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Plate cannot be empty"))]
    pub plate: Option<String>,
    pub kind: Option<String>,
    pub status: Option<VehicleStatus>,
}
