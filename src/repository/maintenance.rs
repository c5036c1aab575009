//! Maintenance records repository

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::MaintenanceStatus,
        equipment::Equipment,
        maintenance::{MaintenanceHistory, MaintenanceRecord},
    },
    workflow,
};

const RECORD_SELECT: &str = r#"
    SELECT r.id, r.equipment_id, eq.model AS equipment_model, r.returned_item_id,
           m.event_id, ev.name AS event_name, r.status, r.problem_description,
           r.solution, r.entered_at, r.exited_at
    FROM maintenance_records r
    JOIN equipment eq ON eq.id = r.equipment_id
    LEFT JOIN returned_items ri ON ri.id = r.returned_item_id
    LEFT JOIN planned_materials m ON m.id = ri.material_id
    LEFT JOIN events ev ON ev.id = m.event_id
"#;

async fn lock_equipment(conn: &mut PgConnection, id: i32) -> AppResult<Equipment> {
    sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
}

async fn save_counters(conn: &mut PgConnection, id: i32, in_stock: i32, in_maintenance: i32) -> AppResult<Equipment> {
    let equipment = sqlx::query_as::<_, Equipment>(
        r#"
        UPDATE equipment SET quantity_in_stock = $1, quantity_in_maintenance = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(in_stock)
    .bind(in_maintenance)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(equipment)
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Records not yet repaired, newest first
    pub async fn list_open(&self) -> AppResult<Vec<MaintenanceRecord>> {
        let query = format!(
            "{} WHERE r.status <> 'REPAIRED' ORDER BY r.entered_at DESC, r.id DESC",
            RECORD_SELECT
        );
        let rows = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Repaired records, most recently closed first
    pub async fn list_repaired(&self) -> AppResult<Vec<MaintenanceRecord>> {
        let query = format!(
            "{} WHERE r.status = 'REPAIRED' ORDER BY r.exited_at DESC NULLS LAST, r.id DESC",
            RECORD_SELECT
        );
        let rows = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRecord> {
        let query = format!("{} WHERE r.id = $1", RECORD_SELECT);
        sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    /// Status changes of a record, oldest first
    pub async fn history(&self, record_id: i32) -> AppResult<Vec<MaintenanceHistory>> {
        let rows = sqlx::query_as::<_, MaintenanceHistory>(
            r#"
            SELECT h.id, h.record_id, h.previous_status, h.new_status, h.note,
                   h.user_id, u.login AS user_login, h.changed_at
            FROM maintenance_history h
            LEFT JOIN users u ON u.id = h.user_id
            WHERE h.record_id = $1
            ORDER BY h.changed_at, h.id
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Move units from stock to maintenance, one record per unit
    pub async fn send_units(&self, equipment_id: i32, quantity: i32, problem: &str) -> AppResult<Equipment> {
        let mut tx = self.pool.begin().await?;
        let equipment = lock_equipment(&mut tx, equipment_id).await?;
        workflow::check_send_to_maintenance(&equipment.model, quantity, equipment.quantity_in_stock)?;

        let updated = save_counters(
            &mut tx,
            equipment_id,
            equipment.quantity_in_stock - quantity,
            workflow::add_units(equipment.quantity_in_maintenance, quantity)?,
        )
        .await?;

        sqlx::query(
            r#"
            INSERT INTO maintenance_records (equipment_id, problem_description)
            SELECT $1, $2 FROM generate_series(1, $3)
            "#,
        )
        .bind(equipment_id)
        .bind(problem)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Move units from maintenance back to stock; records are left as they are
    pub async fn return_units(&self, equipment_id: i32, quantity: i32) -> AppResult<Equipment> {
        let mut tx = self.pool.begin().await?;
        let equipment = lock_equipment(&mut tx, equipment_id).await?;
        workflow::check_return_from_maintenance(&equipment.model, quantity, equipment.quantity_in_maintenance)?;

        let updated = save_counters(
            &mut tx,
            equipment_id,
            workflow::add_units(equipment.quantity_in_stock, quantity)?,
            equipment.quantity_in_maintenance - quantity,
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Change the status of a record and write a history row
    pub async fn update_status(
        &self,
        record_id: i32,
        status: MaintenanceStatus,
        solution: Option<&str>,
        note: Option<&str>,
        user_id: i32,
    ) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let (equipment_id, previous): (i32, MaintenanceStatus) = sqlx::query_as(
            "SELECT equipment_id, status FROM maintenance_records WHERE id = $1 FOR UPDATE",
        )
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", record_id)))?;

        let equipment = lock_equipment(&mut tx, equipment_id).await?;
        let (in_stock, in_maintenance) = workflow::counters_after_status(
            previous,
            status,
            equipment.quantity_in_stock,
            equipment.quantity_in_maintenance,
        )?;
        if (in_stock, in_maintenance) != (equipment.quantity_in_stock, equipment.quantity_in_maintenance) {
            save_counters(&mut tx, equipment_id, in_stock, in_maintenance).await?;
        }

        let exited_at = if status == MaintenanceStatus::Repaired && previous != MaintenanceStatus::Repaired {
            Some(Utc::now())
        } else {
            None
        };
        sqlx::query(
            r#"
            UPDATE maintenance_records
            SET status = $1, solution = $2, exited_at = COALESCE($3, exited_at)
            WHERE id = $4
            "#,
        )
        .bind(status)
        .bind(solution)
        .bind(exited_at)
        .bind(record_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO maintenance_history (record_id, previous_status, new_status, note, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record_id)
        .bind(previous)
        .bind(status)
        .bind(note)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get_by_id(record_id).await
    }
}
