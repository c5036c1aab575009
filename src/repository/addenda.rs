//! Addenda read side; creation lives with the workflow operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::addendum::{Addendum, AddendumDetails, AddendumLine},
};

#[derive(Clone)]
pub struct AddendaRepository {
    pool: Pool<Postgres>,
}

impl AddendaRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Addenda of an event with their lines
    pub async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<AddendumDetails>> {
        let addenda = sqlx::query_as::<_, Addendum>(
            "SELECT * FROM addenda WHERE event_id = $1 ORDER BY created_at, id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let lines = sqlx::query_as::<_, AddendumLine>(
            r#"
            SELECT l.id, l.addendum_id, l.equipment_id, eq.model AS equipment_model, l.quantity
            FROM addendum_lines l
            JOIN addenda a ON a.id = l.addendum_id
            JOIN equipment eq ON eq.id = l.equipment_id
            WHERE a.event_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addenda
            .into_iter()
            .map(|addendum| {
                let lines = lines
                    .iter()
                    .filter(|l| l.addendum_id == addendum.id)
                    .cloned()
                    .collect();
                AddendumDetails { addendum, lines }
            })
            .collect())
    }
}
