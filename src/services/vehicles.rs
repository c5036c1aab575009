//! Vehicles service

use validator::Validate;

use crate::{
    error::AppResult,
    models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
    repository::Repository,
};

#[derive(Clone)]
pub struct VehiclesService {
    repository: Repository,
}

impl VehiclesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.vehicles.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        self.repository.vehicles.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateVehicle) -> AppResult<Vehicle> {
        data.validate()?;
        self.repository.vehicles.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        data.validate()?;
        self.repository.vehicles.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.vehicles.delete(id).await
    }
}
