//! Maintenance records service

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{MaintenanceDetails, MaintenanceRecord, UpdateMaintenanceStatus},
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_open(&self) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.maintenance.list_open().await
    }

    pub async fn list_repaired(&self) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.maintenance.list_repaired().await
    }

    pub async fn get_details(&self, id: i32) -> AppResult<MaintenanceDetails> {
        let record = self.repository.maintenance.get_by_id(id).await?;
        let history = self.repository.maintenance.history(id).await?;
        Ok(MaintenanceDetails { record, history })
    }

    pub async fn update_status(
        &self,
        id: i32,
        data: &UpdateMaintenanceStatus,
        user_id: i32,
    ) -> AppResult<MaintenanceDetails> {
        let status = data
            .status
            .ok_or_else(|| AppError::Validation("status is required".to_string()))?;

        let record = self
            .repository
            .maintenance
            .update_status(id, status, data.solution.as_deref(), data.note.as_deref(), user_id)
            .await?;
        tracing::info!(
            "Maintenance record {} ({}) set to {}",
            record.id,
            record.equipment_model,
            record.status
        );

        let history = self.repository.maintenance.history(id).await?;
        Ok(MaintenanceDetails { record, history })
    }
}
