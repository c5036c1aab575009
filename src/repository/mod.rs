//! Repository layer for database operations

pub mod addenda;
pub mod attendance;
pub mod clients;
pub mod consumables;
pub mod equipment;
pub mod events;
pub mod maintenance;
pub mod materials;
pub mod operations;
pub mod photos;
pub mod reports;
pub mod staff;
pub mod users;
pub mod vehicles;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub clients: clients::ClientsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub consumables: consumables::ConsumablesRepository,
    pub staff: staff::StaffRepository,
    pub vehicles: vehicles::VehiclesRepository,
    pub events: events::EventsRepository,
    pub materials: materials::MaterialsRepository,
    pub operations: operations::OperationsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub photos: photos::PhotosRepository,
    pub attendance: attendance::AttendanceRepository,
    pub addenda: addenda::AddendaRepository,
    pub reports: reports::ReportsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            clients: clients::ClientsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            consumables: consumables::ConsumablesRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            vehicles: vehicles::VehiclesRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            materials: materials::MaterialsRepository::new(pool.clone()),
            operations: operations::OperationsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            photos: photos::PhotosRepository::new(pool.clone()),
            attendance: attendance::AttendanceRepository::new(pool.clone()),
            addenda: addenda::AddendaRepository::new(pool.clone()),
            reports: reports::ReportsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
