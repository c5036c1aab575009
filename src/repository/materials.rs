//! Planned material lines and event consumables

use sqlx::{PgConnection, Pool, Postgres};

use super::events::{lock_event, touch};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EventStatus, SupplyStatus},
        material::{
            CreateEventConsumable, CreateMaterial, EventConsumable, PlannedMaterial, ReturnedItem,
            UpdateEventConsumable, UpdateMaterial,
        },
    },
    workflow,
};

pub(crate) const MATERIAL_SELECT: &str = r#"
    SELECT m.id, m.event_id, m.equipment_id, eq.model AS equipment_model, m.description,
           m.quantity, m.quantity_out, m.reviewed, m.supply_status,
           COALESCE((SELECT SUM(r.quantity) FROM returned_items r
                     WHERE r.material_id = m.id AND r.condition = 'GOOD'), 0)::bigint AS returned_ok,
           COALESCE((SELECT SUM(r.quantity) FROM returned_items r
                     WHERE r.material_id = m.id AND r.condition <> 'GOOD'), 0)::bigint AS returned_damaged
    FROM planned_materials m
    LEFT JOIN equipment eq ON eq.id = m.equipment_id
"#;

const CONSUMABLE_SELECT: &str = r#"
    SELECT ec.id, ec.event_id, ec.consumable_id, c.name AS consumable_name, c.unit,
           ec.quantity, ec.reviewed
    FROM event_consumables ec
    JOIN consumables c ON c.id = ec.consumable_id
"#;

/// Current stock of an equipment, `None` when no equipment is linked
pub(crate) async fn equipment_stock(conn: &mut PgConnection, equipment_id: Option<i32>) -> AppResult<Option<i32>> {
    let Some(equipment_id) = equipment_id else {
        return Ok(None);
    };
    let stock: Option<i32> = sqlx::query_scalar("SELECT quantity_in_stock FROM equipment WHERE id = $1")
        .bind(equipment_id)
        .fetch_optional(&mut *conn)
        .await?;
    stock
        .map(Some)
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment_id)))
}

/// Insert a material line with its supply status computed from stock
pub(crate) async fn insert_line(
    conn: &mut PgConnection,
    event_id: i32,
    equipment_id: Option<i32>,
    description: Option<&str>,
    quantity: i32,
    quantity_out: i32,
) -> AppResult<i32> {
    let stock = equipment_stock(conn, equipment_id).await?;
    let supply = workflow::supply_status_on_save(SupplyStatus::Sufficient, quantity, stock);
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO planned_materials (event_id, equipment_id, description, quantity, quantity_out, supply_status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(event_id)
    .bind(equipment_id)
    .bind(description)
    .bind(quantity)
    .bind(quantity_out)
    .bind(supply)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Store new counters of a material line and recompute its supply status
pub(crate) async fn save_line_counters(
    conn: &mut PgConnection,
    material_id: i32,
    quantity: i32,
    quantity_out: i32,
) -> AppResult<()> {
    let (equipment_id, current): (Option<i32>, SupplyStatus) = sqlx::query_as(
        "SELECT equipment_id, supply_status FROM planned_materials WHERE id = $1",
    )
    .bind(material_id)
    .fetch_one(&mut *conn)
    .await?;
    let stock = equipment_stock(conn, equipment_id).await?;
    let supply = workflow::supply_status_on_save(current, quantity, stock);

    sqlx::query(
        "UPDATE planned_materials SET quantity = $1, quantity_out = $2, supply_status = $3 WHERE id = $4",
    )
    .bind(quantity)
    .bind(quantity_out)
    .bind(supply)
    .bind(material_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct MaterialsRepository {
    pool: Pool<Postgres>,
}

impl MaterialsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Material lines of an event with their return sums
    pub async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<PlannedMaterial>> {
        let query = format!("{} WHERE m.event_id = $1 ORDER BY m.id", MATERIAL_SELECT);
        let rows = sqlx::query_as::<_, PlannedMaterial>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a material line belonging to an event
    pub async fn get_line(&self, event_id: i32, material_id: i32) -> AppResult<PlannedMaterial> {
        let query = format!("{} WHERE m.event_id = $1 AND m.id = $2", MATERIAL_SELECT);
        sqlx::query_as::<_, PlannedMaterial>(&query)
            .bind(event_id)
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material line {} not found", material_id)))
    }

    /// Returned items of every line of an event
    pub async fn returns_for_event(&self, event_id: i32) -> AppResult<Vec<ReturnedItem>> {
        let rows = sqlx::query_as::<_, ReturnedItem>(
            r#"
            SELECT r.* FROM returned_items r
            JOIN planned_materials m ON m.id = r.material_id
            WHERE m.event_id = $1
            ORDER BY r.returned_at, r.id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Add a material line while planning
    pub async fn add_line(&self, event_id: i32, data: &CreateMaterial) -> AppResult<PlannedMaterial> {
        let description = data
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if data.equipment_id.is_none() && description.is_none() {
            return Err(AppError::Validation(
                "Either an equipment or a description is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the material list")?;

        let id = insert_line(&mut tx, event_id, data.equipment_id, description, data.quantity, 0).await?;
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.get_line(event_id, id).await
    }

    /// Change quantity or description of a line while planning
    pub async fn update_line(&self, event_id: i32, material_id: i32, data: &UpdateMaterial) -> AppResult<PlannedMaterial> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the material list")?;

        let (quantity, quantity_out): (i32, i32) = sqlx::query_as(
            "SELECT quantity, quantity_out FROM planned_materials WHERE id = $1 AND event_id = $2 FOR UPDATE",
        )
        .bind(material_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Material line {} not found", material_id)))?;

        if let Some(ref description) = data.description {
            sqlx::query("UPDATE planned_materials SET description = $1 WHERE id = $2")
                .bind(description)
                .bind(material_id)
                .execute(&mut *tx)
                .await?;
        }
        save_line_counters(&mut tx, material_id, data.quantity.unwrap_or(quantity), quantity_out).await?;
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.get_line(event_id, material_id).await
    }

    /// Remove a line while planning
    pub async fn delete_line(&self, event_id: i32, material_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the material list")?;

        let result = sqlx::query("DELETE FROM planned_materials WHERE id = $1 AND event_id = $2")
            .bind(material_id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Material line {} not found", material_id)));
        }
        touch(&mut tx, event_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Flip the reviewed flag of a line
    pub async fn toggle_review(&self, event_id: i32, material_id: i32) -> AppResult<PlannedMaterial> {
        let result = sqlx::query(
            "UPDATE planned_materials SET reviewed = NOT reviewed WHERE id = $1 AND event_id = $2",
        )
        .bind(material_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Material line {} not found", material_id)));
        }
        self.get_line(event_id, material_id).await
    }

    /// Record how a pending shortage was solved, without recomputing the tag
    pub async fn resolve(&self, event_id: i32, material_id: i32, solution: Option<SupplyStatus>) -> AppResult<PlannedMaterial> {
        let mut tx = self.pool.begin().await?;
        let current: SupplyStatus = sqlx::query_scalar(
            "SELECT supply_status FROM planned_materials WHERE id = $1 AND event_id = $2 FOR UPDATE",
        )
        .bind(material_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Material line {} not found", material_id)))?;

        let solution = workflow::resolve_shortage(current, solution)?;
        sqlx::query("UPDATE planned_materials SET supply_status = $1 WHERE id = $2")
            .bind(solution)
            .bind(material_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get_line(event_id, material_id).await
    }

    /// Consumables planned for an event
    pub async fn consumables_for_event(&self, event_id: i32) -> AppResult<Vec<EventConsumable>> {
        let query = format!("{} WHERE ec.event_id = $1 ORDER BY c.name", CONSUMABLE_SELECT);
        let rows = sqlx::query_as::<_, EventConsumable>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_consumable(&self, event_id: i32, id: i32) -> AppResult<EventConsumable> {
        let query = format!("{} WHERE ec.event_id = $1 AND ec.id = $2", CONSUMABLE_SELECT);
        sqlx::query_as::<_, EventConsumable>(&query)
            .bind(event_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event consumable {} not found", id)))
    }

    /// Add a consumable to an event (once per consumable)
    pub async fn add_consumable(&self, event_id: i32, data: &CreateEventConsumable) -> AppResult<EventConsumable> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the consumable list")?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO event_consumables (event_id, consumable_id, quantity) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(event_id)
        .bind(data.consumable_id)
        .bind(data.quantity)
        .fetch_one(&mut *tx)
        .await?;
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.get_consumable(event_id, id).await
    }

    pub async fn update_consumable(&self, event_id: i32, id: i32, data: &UpdateEventConsumable) -> AppResult<EventConsumable> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the consumable list")?;

        let result = sqlx::query("UPDATE event_consumables SET quantity = $1 WHERE id = $2 AND event_id = $3")
            .bind(data.quantity)
            .bind(id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event consumable {} not found", id)));
        }
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.get_consumable(event_id, id).await
    }

    pub async fn delete_consumable(&self, event_id: i32, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "change the consumable list")?;

        let result = sqlx::query("DELETE FROM event_consumables WHERE id = $1 AND event_id = $2")
            .bind(id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event consumable {} not found", id)));
        }
        touch(&mut tx, event_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn toggle_consumable_review(&self, event_id: i32, id: i32) -> AppResult<EventConsumable> {
        let result = sqlx::query(
            "UPDATE event_consumables SET reviewed = NOT reviewed WHERE id = $1 AND event_id = $2",
        )
        .bind(id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event consumable {} not found", id)));
        }
        self.get_consumable(event_id, id).await
    }
}
