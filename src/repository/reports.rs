//! Read-only queries behind reports and dashboards

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::report::RecentDamage};

const DAMAGE_SELECT: &str = r#"
    SELECT r.id AS returned_item_id, ev.id AS event_id, ev.name AS event_name,
           COALESCE(eq.model, m.description, '') AS item,
           r.quantity, r.condition, r.note, r.returned_at
    FROM returned_items r
    JOIN planned_materials m ON m.id = r.material_id
    JOIN events ev ON ev.id = m.event_id
    LEFT JOIN equipment eq ON eq.id = m.equipment_id
"#;

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Postgres>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Latest damaged returns from finished events
    pub async fn recent_damages(&self, limit: i64) -> AppResult<Vec<RecentDamage>> {
        let query = format!(
            "{} WHERE r.condition <> 'GOOD' AND ev.status = 'FINISHED' ORDER BY r.returned_at DESC, r.id DESC LIMIT $1",
            DAMAGE_SELECT
        );
        let rows = sqlx::query_as::<_, RecentDamage>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Damaged returns of one event
    pub async fn event_damages(&self, event_id: i32) -> AppResult<Vec<RecentDamage>> {
        let query = format!(
            "{} WHERE r.condition <> 'GOOD' AND ev.id = $1 ORDER BY r.returned_at, r.id",
            DAMAGE_SELECT
        );
        let rows = sqlx::query_as::<_, RecentDamage>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
