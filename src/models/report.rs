//! Report payloads and dashboard aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{enums::ReturnCondition, event::EventShort};

/// Line of a dispatch or reinforcement guide
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GuideItem {
    pub model: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GuideRequest {
    #[serde(default)]
    pub items: Vec<GuideItem>,
}

/// Damaged return from a finished event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecentDamage {
    pub returned_item_id: i32,
    pub event_id: i32,
    pub event_name: Option<String>,
    /// Equipment model or line description
    pub item: String,
    pub quantity: i32,
    pub condition: ReturnCondition,
    pub note: Option<String>,
    pub returned_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_in_stock: i64,
    pub total_in_maintenance: i64,
    pub upcoming_events: Vec<EventShort>,
}
