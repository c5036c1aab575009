//! Staff model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::StaffKind;

/// Crew member (employee or freelancer)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: i32,
    pub name: String,
    /// Job function (technician, rigger, driver...)
    pub function: Option<String>,
    pub kind: StaffKind,
    pub email: Option<String>,
    pub contact: Option<String>,
}

/// Create staff request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaff {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub function: Option<String>,
    pub kind: Option<StaffKind>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub contact: Option<String>,
}

/// Update staff request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStaff {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub function: Option<String>,
    pub kind: Option<StaffKind>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub contact: Option<String>,
}
