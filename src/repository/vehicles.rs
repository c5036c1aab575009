//! Vehicles repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::VehicleStatus,
        vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
    },
};

#[derive(Clone)]
pub struct VehiclesRepository {
    pool: Pool<Postgres>,
}

impl VehiclesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    pub async fn create(&self, data: &CreateVehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (name, plate, kind, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.plate.trim().to_uppercase())
        .bind(&data.kind)
        .bind(data.status.unwrap_or(VehicleStatus::Available))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        let plate = data.plate.as_ref().map(|p| p.trim().to_uppercase());
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
        add_field!(plate, "plate");
        add_field!(data.kind, "kind");
        add_field!(data.status, "status");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE vehicles SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Vehicle>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(plate);
        bind_field!(data.kind);
        bind_field!(data.status);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vehicle {} not found", id)));
        }
        Ok(())
    }
}
