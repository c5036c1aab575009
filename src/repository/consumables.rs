//! Consumables repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        consumable::{Consumable, CreateConsumable, UpdateConsumable},
        enums::ConsumableCategory,
    },
};

#[derive(Clone)]
pub struct ConsumablesRepository {
    pool: Pool<Postgres>,
}

impl ConsumablesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Consumable>> {
        let rows = sqlx::query_as::<_, Consumable>("SELECT * FROM consumables ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Consumable> {
        sqlx::query_as::<_, Consumable>("SELECT * FROM consumables WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Consumable {} not found", id)))
    }

    pub async fn create(&self, data: &CreateConsumable) -> AppResult<Consumable> {
        let row = sqlx::query_as::<_, Consumable>(
            r#"
            INSERT INTO consumables (name, category, unit, quantity_in_stock)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.category.unwrap_or(ConsumableCategory::Other))
        .bind(data.unit.as_deref().unwrap_or("unit"))
        .bind(data.quantity_in_stock.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateConsumable) -> AppResult<Consumable> {
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
        add_field!(data.category, "category");
        add_field!(data.unit, "unit");
        add_field!(data.quantity_in_stock, "quantity_in_stock");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE consumables SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Consumable>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.unit);
        bind_field!(data.quantity_in_stock);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Consumable {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM consumables WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Consumable {} not found", id)));
        }
        Ok(())
    }
}
