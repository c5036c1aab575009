//! Planned material lines and event consumables

use validator::Validate;

use crate::{
    error::AppResult,
    models::material::{
        CreateEventConsumable, CreateMaterial, EventConsumable, PlannedMaterial, ResolveShortage,
        UpdateEventConsumable, UpdateMaterial,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaterialsService {
    repository: Repository,
}

impl MaterialsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, event_id: i32) -> AppResult<Vec<PlannedMaterial>> {
        self.repository.events.get_by_id(event_id).await?;
        self.repository.materials.list_for_event(event_id).await
    }

    pub async fn add_line(&self, event_id: i32, data: &CreateMaterial) -> AppResult<PlannedMaterial> {
        data.validate()?;
        let line = self.repository.materials.add_line(event_id, data).await?;
        tracing::info!(
            "Added {} x {} to event {} ({})",
            line.quantity,
            line.label(),
            event_id,
            line.supply_status
        );
        Ok(line)
    }

    pub async fn update_line(&self, event_id: i32, id: i32, data: &UpdateMaterial) -> AppResult<PlannedMaterial> {
        data.validate()?;
        self.repository.materials.update_line(event_id, id, data).await
    }

    pub async fn delete_line(&self, event_id: i32, id: i32) -> AppResult<()> {
        self.repository.materials.delete_line(event_id, id).await
    }

    pub async fn toggle_review(&self, event_id: i32, id: i32) -> AppResult<PlannedMaterial> {
        self.repository.materials.toggle_review(event_id, id).await
    }

    pub async fn resolve(&self, event_id: i32, id: i32, data: &ResolveShortage) -> AppResult<PlannedMaterial> {
        let line = self.repository.materials.resolve(event_id, id, data.solution).await?;
        tracing::info!("Shortage of {} on event {} resolved as {}", line.label(), event_id, line.supply_status);
        Ok(line)
    }

    pub async fn consumables(&self, event_id: i32) -> AppResult<Vec<EventConsumable>> {
        self.repository.events.get_by_id(event_id).await?;
        self.repository.materials.consumables_for_event(event_id).await
    }

    pub async fn add_consumable(&self, event_id: i32, data: &CreateEventConsumable) -> AppResult<EventConsumable> {
        data.validate()?;
        self.repository.materials.add_consumable(event_id, data).await
    }

    pub async fn update_consumable(&self, event_id: i32, id: i32, data: &UpdateEventConsumable) -> AppResult<EventConsumable> {
        data.validate()?;
        self.repository.materials.update_consumable(event_id, id, data).await
    }

    pub async fn delete_consumable(&self, event_id: i32, id: i32) -> AppResult<()> {
        self.repository.materials.delete_consumable(event_id, id).await
    }

    pub async fn toggle_consumable_review(&self, event_id: i32, id: i32) -> AppResult<EventConsumable> {
        self.repository.materials.toggle_consumable_review(event_id, id).await
    }
}
