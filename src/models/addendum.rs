//! Addenda: material added to an event after planning

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Addendum {
    pub id: i32,
    pub event_id: i32,
    pub description: String,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AddendumLine {
    pub id: i32,
    pub addendum_id: i32,
    pub equipment_id: i32,
    pub equipment_model: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddendumDetails {
    #[serde(flatten)]
    pub addendum: Addendum,
    pub lines: Vec<AddendumLine>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAddendumLine {
    pub equipment_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddendum {
    pub description: Option<String>,
    #[serde(default)]
    pub lines: Vec<CreateAddendumLine>,
}
