//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    addenda, auth, clients, consumables, equipment, events, health, maintenance, materials, reports,
    staff, users, vehicles, workflow,
};
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Novalite API",
        version = "1.0.0",
        description = "Equipment rental operations REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Equipment
        equipment::list_equipment,
        equipment::list_categories,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::send_to_maintenance,
        equipment::return_from_maintenance,
        // Consumables
        consumables::list_consumables,
        consumables::get_consumable,
        consumables::create_consumable,
        consumables::update_consumable,
        consumables::delete_consumable,
        // Staff
        staff::list_staff,
        staff::get_staff_member,
        staff::create_staff_member,
        staff::update_staff_member,
        staff::delete_staff_member,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::get_crew,
        events::set_crew,
        events::get_vehicles,
        events::set_vehicles,
        events::list_attendance,
        events::confirm_attendance,
        events::list_photos,
        events::upload_photo,
        events::delete_photo,
        // Materials
        materials::list_materials,
        materials::add_material,
        materials::update_material,
        materials::delete_material,
        materials::toggle_material_review,
        materials::resolve_shortage,
        materials::list_event_consumables,
        materials::add_event_consumable,
        materials::update_event_consumable,
        materials::delete_event_consumable,
        materials::toggle_consumable_review,
        // Workflow
        workflow::submit_for_review,
        workflow::approve_list,
        workflow::return_for_correction,
        workflow::record_departure,
        workflow::record_return,
        workflow::add_reinforcement,
        workflow::cancel_event,
        workflow::clone_event,
        addenda::list_addenda,
        addenda::create_addendum,
        // Maintenance
        maintenance::list_open,
        maintenance::list_history,
        maintenance::get_record,
        maintenance::update_status,
        // Reports
        reports::event_report,
        reports::dispatch_guide,
        reports::reinforcement_guide,
        reports::damage_report,
        reports::recent_damages,
        reports::dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Enums
            models::enums::EventStatus,
            models::enums::EventType,
            models::enums::PowerType,
            models::enums::VehicleAccess,
            models::enums::SupplyStatus,
            models::enums::ReturnCondition,
            models::enums::MaintenanceStatus,
            models::enums::EquipmentCategory,
            models::enums::ConsumableCategory,
            models::enums::StaffKind,
            models::enums::VehicleStatus,
            models::enums::Role,
            models::enums::AttendanceParty,
            models::enums::Choice,
            // Registries
            models::user::User,
            models::user::CreateUser,
            models::user::UpdateUser,
            models::client::Client,
            models::client::CreateClient,
            models::client::UpdateClient,
            models::equipment::Equipment,
            models::equipment::CreateEquipment,
            models::equipment::UpdateEquipment,
            models::equipment::SendToMaintenance,
            models::equipment::ReturnFromMaintenance,
            models::consumable::Consumable,
            models::consumable::CreateConsumable,
            models::consumable::UpdateConsumable,
            models::staff::Staff,
            models::staff::CreateStaff,
            models::staff::UpdateStaff,
            models::vehicle::Vehicle,
            models::vehicle::CreateVehicle,
            models::vehicle::UpdateVehicle,
            // Events
            models::event::Event,
            models::event::EventShort,
            models::event::EventDetails,
            models::event::CreateEvent,
            models::event::UpdateEvent,
            models::event::SetCrew,
            models::event::SetVehicles,
            models::material::PlannedMaterial,
            models::material::MaterialDetails,
            models::material::CreateMaterial,
            models::material::UpdateMaterial,
            models::material::ResolveShortage,
            models::material::ReturnedItem,
            models::material::EventConsumable,
            models::material::CreateEventConsumable,
            models::material::UpdateEventConsumable,
            models::photo::Photo,
            models::attendance::AttendanceConfirmation,
            models::attendance::ConfirmAttendance,
            models::addendum::Addendum,
            models::addendum::AddendumLine,
            models::addendum::AddendumDetails,
            models::addendum::CreateAddendum,
            models::addendum::CreateAddendumLine,
            // Workflow
            models::workflow::DepartureItem,
            models::workflow::DepartureRequest,
            models::workflow::ReturnItem,
            models::workflow::ReturnRequest,
            models::workflow::ReinforcementItem,
            models::workflow::ReinforcementRequest,
            models::workflow::CorrectionRequest,
            models::workflow::CancelRequest,
            models::workflow::CloneRequest,
            // Maintenance
            models::maintenance::MaintenanceRecord,
            models::maintenance::MaintenanceHistory,
            models::maintenance::MaintenanceDetails,
            models::maintenance::UpdateMaintenanceStatus,
            // Reports
            models::report::GuideItem,
            models::report::GuideRequest,
            models::report::RecentDamage,
            models::report::DashboardStats,
            events::PhotoUpload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "clients", description = "Client registry"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "consumables", description = "Consumable inventory"),
        (name = "staff", description = "Staff registry"),
        (name = "vehicles", description = "Fleet registry"),
        (name = "events", description = "Events, crew, attendance and photos"),
        (name = "materials", description = "Planned material and consumables"),
        (name = "workflow", description = "Event workflow actions"),
        (name = "maintenance", description = "Equipment maintenance"),
        (name = "reports", description = "PDF reports and dashboards")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
