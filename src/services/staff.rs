//! Staff service

use validator::Validate;

use crate::{
    error::AppResult,
    models::staff::{CreateStaff, Staff, UpdateStaff},
    repository::Repository,
};

#[derive(Clone)]
pub struct StaffService {
    repository: Repository,
}

impl StaffService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Staff>> {
        self.repository.staff.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Staff> {
        self.repository.staff.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateStaff) -> AppResult<Staff> {
        data.validate()?;
        self.repository.staff.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateStaff) -> AppResult<Staff> {
        data.validate()?;
        self.repository.staff.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.staff.delete(id).await
    }
}
