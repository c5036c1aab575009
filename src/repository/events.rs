//! Events repository

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EventStatus, EventType},
        event::{CreateEvent, Event, EventQuery, EventShort, UpdateEvent},
        staff::Staff,
        vehicle::Vehicle,
    },
};

const SHORT_SELECT: &str = r#"
    SELECT e.id, e.status, e.event_type, e.name, e.location, e.client_id,
           c.company AS client_company, e.start_date, e.end_date
    FROM events e
    JOIN clients c ON c.id = e.client_id
"#;

/// Load an event and lock its row until the transaction ends
pub(crate) async fn lock_event(conn: &mut PgConnection, id: i32) -> AppResult<Event> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
}

/// Change the status of a locked event
pub(crate) async fn set_status(conn: &mut PgConnection, id: i32, status: EventStatus) -> AppResult<Event> {
    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET status = $1, modified_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(event)
}

/// Bump the modification time of an event
pub(crate) async fn touch(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    sqlx::query("UPDATE events SET modified_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Page size and row offset for a list request
fn page_window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(50).clamp(1, 200);
    (per_page, (page - 1).saturating_mul(per_page))
}

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with optional filters and pagination
    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<EventShort>, i64)> {
        let (per_page, offset) = page_window(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("e.status = ${}", idx));
            idx += 1;
        }
        if query.client_id.is_some() {
            conditions.push(format!("e.client_id = ${}", idx));
            idx += 1;
        }
        if query.from.is_some() {
            conditions.push(format!("e.start_date >= ${}", idx));
            idx += 1;
        }
        if query.to.is_some() {
            conditions.push(format!("e.start_date <= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_q = format!("SELECT COUNT(*) FROM events e {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(status) = query.status { count_builder = count_builder.bind(status); }
        if let Some(client_id) = query.client_id { count_builder = count_builder.bind(client_id); }
        if let Some(from) = query.from { count_builder = count_builder.bind(from); }
        if let Some(to) = query.to { count_builder = count_builder.bind(to); }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows
        let select_q = format!(
            "{} {} ORDER BY e.start_date DESC, e.id DESC LIMIT {} OFFSET {}",
            SHORT_SELECT, where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, EventShort>(&select_q);
        if let Some(status) = query.status { builder = builder.bind(status); }
        if let Some(client_id) = query.client_id { builder = builder.bind(client_id); }
        if let Some(from) = query.from { builder = builder.bind(from); }
        if let Some(to) = query.to { builder = builder.bind(to); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Next events starting on or after `from`
    pub async fn upcoming(&self, from: NaiveDate, limit: i64) -> AppResult<Vec<EventShort>> {
        let select_q = format!(
            "{} WHERE e.start_date >= $1 ORDER BY e.start_date, e.id LIMIT $2",
            SHORT_SELECT
        );
        let rows = sqlx::query_as::<_, EventShort>(&select_q)
            .bind(from)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Create an event in planning
    pub async fn create(&self, data: &CreateEvent, created_by: i32) -> AppResult<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                status, event_type, name, location, client_id,
                site_contact_name, site_contact_phone,
                assembly_date, start_date, end_date,
                power_type, power_distance_m, vehicle_access, needs_generator,
                technical_notes, created_by, team_leader_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(EventStatus::Planning)
        .bind(data.event_type.unwrap_or(EventType::Own))
        .bind(&data.name)
        .bind(&data.location)
        .bind(data.client_id)
        .bind(&data.site_contact_name)
        .bind(&data.site_contact_phone)
        .bind(data.assembly_date)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.power_type)
        .bind(data.power_distance_m.unwrap_or(0))
        .bind(data.vehicle_access)
        .bind(data.needs_generator.unwrap_or(false))
        .bind(&data.technical_notes)
        .bind(created_by)
        .bind(data.team_leader_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an event header, only while it is being planned
    pub async fn update(&self, id: i32, data: &UpdateEvent) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;
        let event = lock_event(&mut tx, id).await?;
        crate::workflow::ensure_status(event.status, &[EventStatus::Planning], "edit the event")?;
        crate::workflow::check_dates(
            data.start_date.unwrap_or(event.start_date),
            data.end_date.or(event.end_date),
        )?;

        let now = Utc::now();
        let mut sets = vec!["modified_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.event_type, "event_type");
        add_field!(data.name, "name");
        add_field!(data.location, "location");
        add_field!(data.client_id, "client_id");
        add_field!(data.site_contact_name, "site_contact_name");
        add_field!(data.site_contact_phone, "site_contact_phone");
        add_field!(data.assembly_date, "assembly_date");
        add_field!(data.start_date, "start_date");
        add_field!(data.end_date, "end_date");
        add_field!(data.power_type, "power_type");
        add_field!(data.power_distance_m, "power_distance_m");
        add_field!(data.vehicle_access, "vehicle_access");
        add_field!(data.needs_generator, "needs_generator");
        add_field!(data.technical_notes, "technical_notes");
        add_field!(data.team_leader_id, "team_leader_id");

        let query = format!("UPDATE events SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Event>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.event_type);
        bind_field!(data.name);
        bind_field!(data.location);
        bind_field!(data.client_id);
        bind_field!(data.site_contact_name);
        bind_field!(data.site_contact_phone);
        bind_field!(data.assembly_date);
        bind_field!(data.start_date);
        bind_field!(data.end_date);
        bind_field!(data.power_type);
        bind_field!(data.power_distance_m);
        bind_field!(data.vehicle_access);
        bind_field!(data.needs_generator);
        bind_field!(data.technical_notes);
        bind_field!(data.team_leader_id);

        let updated = builder.fetch_one(&mut *tx).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Delete an event (children are removed by cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    /// Crew roster of an event
    pub async fn crew(&self, event_id: i32) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, Staff>(
            r#"
            SELECT s.* FROM staff s
            JOIN event_crew ec ON ec.staff_id = s.id
            WHERE ec.event_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Replace the crew roster
    pub async fn set_crew(&self, event_id: i32, staff_ids: &[i32]) -> AppResult<Vec<Staff>> {
        let mut tx = self.pool.begin().await?;
        lock_event(&mut tx, event_id).await?;

        let known: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT id) FROM staff WHERE id = ANY($1)")
            .bind(staff_ids)
            .fetch_one(&mut *tx)
            .await?;
        if known != distinct_count(staff_ids) {
            return Err(AppError::Validation("Unknown staff member in crew".to_string()));
        }

        sqlx::query("DELETE FROM event_crew WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO event_crew (event_id, staff_id) SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(staff_ids)
        .execute(&mut *tx)
        .await?;
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.crew(event_id).await
    }

    /// Vehicles assigned to an event
    pub async fn vehicles(&self, event_id: i32) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.* FROM vehicles v
            JOIN event_vehicles ev ON ev.vehicle_id = v.id
            WHERE ev.event_id = $1
            ORDER BY v.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Replace the vehicle assignment
    pub async fn set_vehicles(&self, event_id: i32, vehicle_ids: &[i32]) -> AppResult<Vec<Vehicle>> {
        let mut tx = self.pool.begin().await?;
        lock_event(&mut tx, event_id).await?;

        let known: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT id) FROM vehicles WHERE id = ANY($1)")
            .bind(vehicle_ids)
            .fetch_one(&mut *tx)
            .await?;
        if known != distinct_count(vehicle_ids) {
            return Err(AppError::Validation("Unknown vehicle in assignment".to_string()));
        }

        sqlx::query("DELETE FROM event_vehicles WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO event_vehicles (event_id, vehicle_id) SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(vehicle_ids)
        .execute(&mut *tx)
        .await?;
        touch(&mut tx, event_id).await?;
        tx.commit().await?;

        self.vehicles(event_id).await
    }

    /// Whether any returned item of the event is not in good condition
    pub async fn has_damage(&self, event_id: i32) -> AppResult<bool> {
        let damaged: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM returned_items r
                JOIN planned_materials m ON m.id = r.material_id
                WHERE m.event_id = $1 AND r.condition <> 'GOOD'
            )
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(damaged)
    }
}

fn distinct_count(ids: &[i32]) -> i64 {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_count_ignores_duplicates() {
        assert_eq!(distinct_count(&[3, 1, 3, 2, 1]), 3);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(None, None), (50, 0));
        assert_eq!(page_window(Some(3), Some(20)), (20, 40));
        assert_eq!(page_window(Some(-4), Some(1000)), (200, 0));
        assert_eq!(page_window(Some(i64::MAX), Some(200)), (200, i64::MAX));
    }
}
