//! Clients repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::client::{Client, CreateClient, UpdateClient},
};

#[derive(Clone)]
pub struct ClientsRepository {
    pool: Pool<Postgres>,
}

impl ClientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all clients ordered by company
    pub async fn list(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY company")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get client by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Client> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    /// Create a client
    pub async fn create(&self, data: &CreateClient) -> AppResult<Client> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (company, representative, address, email, phone, representative_phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.company)
        .bind(&data.representative)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.representative_phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a client (only provided fields)
    pub async fn update(&self, id: i32, data: &UpdateClient) -> AppResult<Client> {
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

        add_field!(data.company, "company");
        add_field!(data.representative, "representative");
        add_field!(data.address, "address");
        add_field!(data.email, "email");
        add_field!(data.phone, "phone");
        add_field!(data.representative_phone, "representative_phone");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE clients SET {} WHERE id = {} RETURNING *", sets.join(", "), id);
        let mut builder = sqlx::query_as::<_, Client>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.company);
        bind_field!(data.representative);
        bind_field!(data.address);
        bind_field!(data.email);
        bind_field!(data.phone);
        bind_field!(data.representative_phone);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    /// Delete a client and, by cascade, its events
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Client {} not found", id)));
        }
        Ok(())
    }
}
