//! Attendance confirmations repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{attendance::AttendanceConfirmation, enums::AttendanceParty},
};

const ATTENDANCE_SELECT: &str = r#"
    SELECT a.id, a.event_id, a.staff_id, s.name AS staff_name,
           a.confirmed_by_leader, a.confirmed_by_member,
           a.leader_confirmed_at, a.member_confirmed_at,
           (a.confirmed_by_leader AND a.confirmed_by_member) AS presence_confirmed
    FROM attendance_confirmations a
    JOIN staff s ON s.id = a.staff_id
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: Pool<Postgres>,
}

impl AttendanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<AttendanceConfirmation>> {
        let query = format!("{} WHERE a.event_id = $1 ORDER BY s.name", ATTENDANCE_SELECT);
        let rows = sqlx::query_as::<_, AttendanceConfirmation>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Stamp the leader or member confirmation of a crew member
    pub async fn confirm(&self, event_id: i32, staff_id: i32, party: AttendanceParty) -> AppResult<AttendanceConfirmation> {
        let in_crew: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM event_crew WHERE event_id = $1 AND staff_id = $2)",
        )
        .bind(event_id)
        .bind(staff_id)
        .fetch_one(&self.pool)
        .await?;
        if !in_crew {
            return Err(AppError::Validation(format!(
                "Staff member {} is not in the crew of event {}",
                staff_id, event_id
            )));
        }

        let statement = match party {
            AttendanceParty::Leader => {
                r#"
                INSERT INTO attendance_confirmations (event_id, staff_id, confirmed_by_leader, leader_confirmed_at)
                VALUES ($1, $2, TRUE, $3)
                ON CONFLICT (event_id, staff_id)
                DO UPDATE SET confirmed_by_leader = TRUE, leader_confirmed_at = EXCLUDED.leader_confirmed_at
                "#
            }
            AttendanceParty::Member => {
                r#"
                INSERT INTO attendance_confirmations (event_id, staff_id, confirmed_by_member, member_confirmed_at)
                VALUES ($1, $2, TRUE, $3)
                ON CONFLICT (event_id, staff_id)
                DO UPDATE SET confirmed_by_member = TRUE, member_confirmed_at = EXCLUDED.member_confirmed_at
                "#
            }
        };
        sqlx::query(statement)
            .bind(event_id)
            .bind(staff_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let query = format!("{} WHERE a.event_id = $1 AND a.staff_id = $2", ATTENDANCE_SELECT);
        let row = sqlx::query_as::<_, AttendanceConfirmation>(&query)
            .bind(event_id)
            .bind(staff_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}
