//! Clients service

use validator::Validate;

use crate::{
    error::AppResult,
    models::client::{Client, CreateClient, UpdateClient},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.repository.clients.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Client> {
        self.repository.clients.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateClient) -> AppResult<Client> {
        data.validate()?;
        self.repository.clients.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateClient) -> AppResult<Client> {
        data.validate()?;
        self.repository.clients.update(id, data).await
    }

    /// Deleting a client also deletes its events
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.clients.delete(id).await?;
        tracing::info!("Deleted client {}", id);
        Ok(())
    }
}
