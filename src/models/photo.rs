//! Event photo metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Photo {
    pub id: i32,
    pub event_id: i32,
    /// File name relative to the media root
    pub file_name: String,
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
