//! Event photos repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::photo::Photo,
};

#[derive(Clone)]
pub struct PhotosRepository {
    pool: Pool<Postgres>,
}

impl PhotosRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<Photo>> {
        let rows = sqlx::query_as::<_, Photo>(
            "SELECT * FROM photos WHERE event_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, event_id: i32, file_name: &str, description: Option<&str>) -> AppResult<Photo> {
        let row = sqlx::query_as::<_, Photo>(
            "INSERT INTO photos (event_id, file_name, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(event_id)
        .bind(file_name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete the row and return it so the file can be removed
    pub async fn delete(&self, event_id: i32, id: i32) -> AppResult<Photo> {
        sqlx::query_as::<_, Photo>("DELETE FROM photos WHERE id = $1 AND event_id = $2 RETURNING *")
            .bind(id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
    }
}
