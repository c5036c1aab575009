//! Event workflow transitions and stock movements
//!
//! Every method runs in one transaction that starts by locking the event
//! row. Movements touching stock also lock the involved equipment rows, in
//! id order, before reading their counters.

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    events::{lock_event, set_status, touch},
    materials::{equipment_stock, insert_line, save_line_counters},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        addendum::CreateAddendumLine,
        enums::EventStatus,
        event::Event,
        workflow::{DepartureItem, ReinforcementItem, ReturnItem},
    },
    workflow::{self, ApprovalLine, LineSnapshot, StockLedger, StockSnapshot},
};

/// Load the event's material lines and lock the equipment they use
async fn load_ledger(conn: &mut PgConnection, event_id: i32, extra_equipment: &[i32]) -> AppResult<StockLedger> {
    let rows: Vec<(i32, Option<i32>, String, i32, i32, i64)> = sqlx::query_as(
        r#"
        SELECT m.id, m.equipment_id,
               COALESCE(eq.model, m.description, ''),
               m.quantity, m.quantity_out,
               COALESCE((SELECT SUM(r.quantity) FROM returned_items r WHERE r.material_id = m.id), 0)::bigint
        FROM planned_materials m
        LEFT JOIN equipment eq ON eq.id = m.equipment_id
        WHERE m.event_id = $1
        ORDER BY m.id
        "#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    let lines: Vec<LineSnapshot> = rows
        .into_iter()
        .map(|(id, equipment_id, label, planned, out, returned)| LineSnapshot {
            id,
            equipment_id,
            label,
            planned,
            out,
            returned: returned as i32,
        })
        .collect();

    let mut equipment_ids: Vec<i32> = lines
        .iter()
        .filter_map(|l| l.equipment_id)
        .chain(extra_equipment.iter().copied())
        .collect();
    equipment_ids.sort_unstable();
    equipment_ids.dedup();

    let stock: Vec<(i32, String, i32, i32)> = sqlx::query_as(
        r#"
        SELECT id, model, quantity_in_stock, quantity_in_maintenance
        FROM equipment
        WHERE id = ANY($1)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(&equipment_ids)
    .fetch_all(&mut *conn)
    .await?;

    let stock = stock
        .into_iter()
        .map(|(equipment_id, model, in_stock, in_maintenance)| StockSnapshot {
            equipment_id,
            model,
            in_stock,
            in_maintenance,
        })
        .collect();

    Ok(StockLedger::new(lines, stock))
}

/// Write back the counters changed by the ledger, stock first
async fn persist_ledger(conn: &mut PgConnection, event: &Event, ledger: &StockLedger) -> AppResult<()> {
    for stock in ledger.changed_stock() {
        sqlx::query(
            "UPDATE equipment SET quantity_in_stock = $1, quantity_in_maintenance = $2 WHERE id = $3",
        )
        .bind(stock.in_stock)
        .bind(stock.in_maintenance)
        .bind(stock.equipment_id)
        .execute(&mut *conn)
        .await?;
    }

    for line in ledger.changed_lines() {
        save_line_counters(conn, line.id, line.planned, line.out).await?;
    }

    for (equipment_id, quantity) in ledger.new_lines() {
        insert_line(conn, event.id, Some(equipment_id), None, quantity, quantity).await?;
    }

    let event_name = event.display_name();
    for receipt in ledger.receipts() {
        let returned_item_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO returned_items (material_id, quantity, condition, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(receipt.material_id)
        .bind(receipt.quantity)
        .bind(receipt.condition)
        .bind(&receipt.note)
        .fetch_one(&mut *conn)
        .await?;

        let units = receipt.maintenance_units();
        if let Some(equipment_id) = receipt.equipment_id.filter(|_| units > 0) {
            let problem = workflow::return_problem_description(
                &event_name,
                receipt.condition,
                receipt.note.as_deref(),
            );
            sqlx::query(
                r#"
                INSERT INTO maintenance_records (equipment_id, returned_item_id, problem_description)
                SELECT $1, $2, $3 FROM generate_series(1, $4)
                "#,
            )
            .bind(equipment_id)
            .bind(returned_item_id)
            .bind(&problem)
            .bind(units)
            .execute(&mut *conn)
            .await?;
            tracing::info!(
                "Opened {} maintenance record(s) for equipment {} returned {} from event {}",
                units, equipment_id, receipt.condition, event.id
            );
        }
    }

    touch(conn, event.id).await
}

#[derive(Clone)]
pub struct OperationsRepository {
    pool: Pool<Postgres>,
}

impl OperationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// PLANNING -> AWAITING_REVIEW
    pub async fn submit_for_review(&self, event_id: i32) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::Planning], "submit the list for review")?;

        let event = set_status(&mut tx, event_id, EventStatus::AwaitingReview).await?;
        tx.commit().await?;
        Ok(event)
    }

    /// AWAITING_REVIEW -> AWAITING_DEPARTURE when every line is reviewed and covered
    pub async fn approve_list(&self, event_id: i32) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::AwaitingReview], "approve the list")?;

        let rows: Vec<(String, bool, i32, Option<i32>)> = sqlx::query_as(
            r#"
            SELECT COALESCE(eq.model, m.description, ''), m.reviewed, m.quantity, eq.quantity_in_stock
            FROM planned_materials m
            LEFT JOIN equipment eq ON eq.id = m.equipment_id
            WHERE m.event_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(event_id)
        .fetch_all(&mut *tx)
        .await?;

        let lines: Vec<ApprovalLine> = rows
            .into_iter()
            .map(|(label, reviewed, planned, stock)| ApprovalLine {
                label,
                reviewed,
                planned,
                stock,
            })
            .collect();
        workflow::check_approval(&lines)?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET status = $1, correction_note = NULL, modified_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(EventStatus::AwaitingDeparture)
        .bind(Utc::now())
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(event)
    }

    /// AWAITING_REVIEW -> PLANNING with a note, clearing every review flag
    pub async fn return_for_correction(&self, event_id: i32, note: &str) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::AwaitingReview], "return the list for correction")?;

        sqlx::query("UPDATE planned_materials SET reviewed = FALSE WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET status = $1, correction_note = $2, modified_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(EventStatus::Planning)
        .bind(note)
        .bind(Utc::now())
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(event)
    }

    /// Check material out; the first departure starts the event
    pub async fn record_departure(&self, event_id: i32, items: &[DepartureItem]) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, workflow::DEPARTURE_ALLOWED, "record a departure")?;

        let mut ledger = load_ledger(&mut tx, event_id, &[]).await?;
        ledger.depart(items)?;
        persist_ledger(&mut tx, &event, &ledger).await?;

        let event = if event.status == EventStatus::AwaitingDeparture {
            set_status(&mut tx, event_id, EventStatus::InProgress).await?
        } else {
            event
        };
        tx.commit().await?;
        Ok(event)
    }

    /// Check material back in; the event finishes when nothing is left outside
    pub async fn record_return(&self, event_id: i32, items: &[ReturnItem]) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::InProgress], "record a return")?;

        let mut ledger = load_ledger(&mut tx, event_id, &[]).await?;
        ledger.receive(items)?;
        persist_ledger(&mut tx, &event, &ledger).await?;

        let event = if ledger.all_returned() {
            set_status(&mut tx, event_id, EventStatus::Finished).await?
        } else {
            event
        };
        tx.commit().await?;
        Ok(event)
    }

    /// Add material to a running event and check it out at once
    pub async fn add_reinforcement(&self, event_id: i32, items: &[ReinforcementItem]) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, &[EventStatus::InProgress], "add reinforcement material")?;

        let requested: Vec<i32> = items.iter().map(|i| i.equipment_id).collect();
        let mut ledger = load_ledger(&mut tx, event_id, &requested).await?;
        ledger.reinforce(items)?;
        persist_ledger(&mut tx, &event, &ledger).await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Cancel an event that has not left the warehouse yet
    pub async fn cancel(&self, event_id: i32, reason: &str) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, workflow::CANCELLABLE, "cancel the event")?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET status = $1, cancellation_reason = $2, modified_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(EventStatus::Cancelled)
        .bind(reason)
        .bind(Utc::now())
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(event)
    }

    /// Duplicate the header, material lines and crew of an event
    pub async fn clone_event(
        &self,
        source_id: i32,
        name: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        created_by: i32,
    ) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                status, event_type, name, location, client_id,
                site_contact_name, site_contact_phone,
                assembly_date, start_date, end_date,
                power_type, power_distance_m, vehicle_access, needs_generator,
                technical_notes, created_by, team_leader_id
            )
            SELECT $1, event_type, $2, location, client_id,
                   site_contact_name, site_contact_phone,
                   assembly_date, $3, $4,
                   power_type, power_distance_m, vehicle_access, needs_generator,
                   technical_notes, $5, team_leader_id
            FROM events WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(EventStatus::Planning)
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(created_by)
        .bind(source_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", source_id)))?;

        let lines: Vec<(Option<i32>, Option<String>, i32)> = sqlx::query_as(
            "SELECT equipment_id, description, quantity FROM planned_materials WHERE event_id = $1 ORDER BY id",
        )
        .bind(source_id)
        .fetch_all(&mut *tx)
        .await?;
        for (equipment_id, description, quantity) in &lines {
            insert_line(&mut tx, event.id, *equipment_id, description.as_deref(), *quantity, 0).await?;
        }

        sqlx::query(
            "INSERT INTO event_crew (event_id, staff_id) SELECT $1, staff_id FROM event_crew WHERE event_id = $2",
        )
        .bind(event.id)
        .bind(source_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Record an addendum and add its quantities to the planned lines
    pub async fn add_addendum(
        &self,
        event_id: i32,
        description: &str,
        lines: &[CreateAddendumLine],
        created_by: i32,
    ) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, event_id).await?;
        workflow::ensure_status(event.status, workflow::ADDENDUM_ALLOWED, "add an addendum")?;

        let addendum_id: i32 = sqlx::query_scalar(
            "INSERT INTO addenda (event_id, description, created_by) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(event_id)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            if line.quantity <= 0 {
                return Err(AppError::BusinessRule(
                    "Addendum quantities must be positive".to_string(),
                ));
            }
            equipment_stock(&mut tx, Some(line.equipment_id)).await?;
            sqlx::query("INSERT INTO addendum_lines (addendum_id, equipment_id, quantity) VALUES ($1, $2, $3)")
                .bind(addendum_id)
                .bind(line.equipment_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;

            let existing: Option<(i32, i32, i32)> = sqlx::query_as(
                r#"
                SELECT id, quantity, quantity_out FROM planned_materials
                WHERE event_id = $1 AND equipment_id = $2
                ORDER BY id
                LIMIT 1
                "#,
            )
            .bind(event_id)
            .bind(line.equipment_id)
            .fetch_optional(&mut *tx)
            .await?;

            match existing {
                Some((material_id, planned, out)) => {
                    let planned = workflow::add_units(planned, line.quantity)?;
                    save_line_counters(&mut tx, material_id, planned, out).await?;
                }
                None => {
                    insert_line(&mut tx, event_id, Some(line.equipment_id), None, line.quantity, 0).await?;
                }
            }
        }

        touch(&mut tx, event_id).await?;
        tx.commit().await?;
        Ok(addendum_id)
    }
}
