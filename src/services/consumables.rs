//! Consumables service

use validator::Validate;

use crate::{
    error::AppResult,
    models::consumable::{Consumable, CreateConsumable, UpdateConsumable},
    repository::Repository,
};

#[derive(Clone)]
pub struct ConsumablesService {
    repository: Repository,
}

impl ConsumablesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Consumable>> {
        self.repository.consumables.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Consumable> {
        self.repository.consumables.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateConsumable) -> AppResult<Consumable> {
        data.validate()?;
        self.repository.consumables.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateConsumable) -> AppResult<Consumable> {
        data.validate()?;
        self.repository.consumables.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.consumables.delete(id).await
    }
}
