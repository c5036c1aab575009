//! Staff repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::StaffKind,
        staff::{CreateStaff, Staff, UpdateStaff},
    },
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, Staff>("SELECT * FROM staff ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Staff> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member {} not found", id)))
    }

    pub async fn create(&self, data: &CreateStaff) -> AppResult<Staff> {
        let row = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (name, function, kind, email, contact)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.function)
        .bind(data.kind.unwrap_or(StaffKind::Employee))
        .bind(&data.email)
        .bind(&data.contact)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateStaff) -> AppResult<Staff> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.function, "function");
        add_field!(data.kind, "kind");
        add_field!(data.email, "email");
        add_field!(data.contact, "contact");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE staff SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Staff>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.function);
        bind_field!(data.kind);
        bind_field!(data.email);
        bind_field!(data.contact);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Staff member {} not found", id)));
        }
        Ok(())
    }
}
