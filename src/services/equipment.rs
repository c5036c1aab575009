//! Equipment service, including manual maintenance transfers

use validator::Validate;

use crate::{
    error::AppResult,
    models::equipment::{
        CreateEquipment, Equipment, EquipmentQuery, ReturnFromMaintenance, SendToMaintenance,
        UpdateEquipment,
    },
    repository::Repository,
    workflow,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.repository.equipment.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.repository.equipment.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await
    }

    /// Move units from stock to maintenance, opening one record per unit
    pub async fn send_to_maintenance(&self, id: i32, data: &SendToMaintenance) -> AppResult<Equipment> {
        let problem = workflow::require_text(data.problem_description.as_deref(), "Problem description")?;
        let equipment = self
            .repository
            .maintenance
            .send_units(id, data.quantity, &problem)
            .await?;
        tracing::info!(
            "Sent {} unit(s) of {} to maintenance (stock {}, maintenance {})",
            data.quantity,
            equipment.model,
            equipment.quantity_in_stock,
            equipment.quantity_in_maintenance
        );
        Ok(equipment)
    }

    /// Bring units back from maintenance to stock
    pub async fn return_from_maintenance(&self, id: i32, data: &ReturnFromMaintenance) -> AppResult<Equipment> {
        let equipment = self
            .repository
            .maintenance
            .return_units(id, data.quantity)
            .await?;
        tracing::info!(
            "Returned {} unit(s) of {} from maintenance (stock {}, maintenance {})",
            data.quantity,
            equipment.model,
            equipment.quantity_in_stock,
            equipment.quantity_in_maintenance
        );
        Ok(equipment)
    }
}
