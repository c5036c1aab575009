//! Business logic services

pub mod clients;
pub mod consumables;
pub mod equipment;
pub mod events;
pub mod maintenance;
pub mod materials;
pub mod operations;
pub mod reports;
pub mod staff;
pub mod users;
pub mod vehicles;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub clients: clients::ClientsService,
    pub equipment: equipment::EquipmentService,
    pub consumables: consumables::ConsumablesService,
    pub staff: staff::StaffService,
    pub vehicles: vehicles::VehiclesService,
    pub events: events::EventsService,
    pub materials: materials::MaterialsService,
    pub operations: operations::OperationsService,
    pub maintenance: maintenance::MaintenanceService,
    pub reports: reports::ReportsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let users = users::UsersService::new(repository.clone(), config.auth.clone());
        let events = events::EventsService::new(repository.clone(), config.media.clone());
        Self {
            clients: clients::ClientsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            consumables: consumables::ConsumablesService::new(repository.clone()),
            staff: staff::StaffService::new(repository.clone()),
            vehicles: vehicles::VehiclesService::new(repository.clone()),
            materials: materials::MaterialsService::new(repository.clone()),
            operations: operations::OperationsService::new(repository.clone(), users.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone(), events.clone()),
            users,
            events,
            repository,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
