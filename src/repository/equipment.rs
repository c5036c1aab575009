//! Equipment repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional search and category filter
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.search.is_some() {
            conditions.push(format!("(model ILIKE ${0} OR manufacturer ILIKE ${0})", idx));
            idx += 1;
        }
        if query.category.is_some() {
            conditions.push(format!("category = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!("SELECT * FROM equipment {} ORDER BY model", where_clause);
        let mut builder = sqlx::query_as::<_, Equipment>(&select_q);
        if let Some(ref search) = query.search {
            builder = builder.bind(format!("%{}%", search.trim()));
        }
        if let Some(category) = query.category {
            builder = builder.bind(category);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (model, manufacturer, category, quantity_in_stock, quantity_in_maintenance, weight)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.model)
        .bind(&data.manufacturer)
        .bind(data.category.unwrap_or(crate::models::enums::EquipmentCategory::Accessories))
        .bind(data.quantity_in_stock.unwrap_or(0))
        .bind(data.quantity_in_maintenance.unwrap_or(0))
        .bind(data.weight)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
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

        add_field!(data.model, "model");
        add_field!(data.manufacturer, "manufacturer");
        add_field!(data.category, "category");
        add_field!(data.quantity_in_stock, "quantity_in_stock");
        add_field!(data.quantity_in_maintenance, "quantity_in_maintenance");
        add_field!(data.weight, "weight");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE equipment SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Equipment>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.model);
        bind_field!(data.manufacturer);
        bind_field!(data.category);
        bind_field!(data.quantity_in_stock);
        bind_field!(data.quantity_in_maintenance);
        bind_field!(data.weight);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Sum of stock and maintenance counters over all equipment
    pub async fn totals(&self) -> AppResult<(i64, i64)> {
        let totals: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(quantity_in_stock), 0)::bigint,
                   COALESCE(SUM(quantity_in_maintenance), 0)::bigint
            FROM equipment
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }
}
