//! Novalite Server - Rental Operations
//!
//! REST API server for event planning, logistics and maintenance.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use novalite_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Novalite Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    tokio::fs::create_dir_all(&config.media.root)
        .await
        .with_context(|| format!("Failed to create media directory {}", config.media.root))?;

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config);
    services.users.ensure_bootstrap_admin().await?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Console output, plus daily rolling files when a log directory is configured
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("novalite_server={},tower_http=debug", logging.level).into());

    let console = if logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().pretty().boxed()
    };

    let (file, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "novalite.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = state.config.media.max_upload_bytes;

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        // Clients
        .route("/clients", get(api::clients::list_clients).post(api::clients::create_client))
        .route(
            "/clients/:id",
            get(api::clients::get_client)
                .put(api::clients::update_client)
                .delete(api::clients::delete_client),
        )
        // Equipment
        .route(
            "/equipment",
            get(api::equipment::list_equipment).post(api::equipment::create_equipment),
        )
        .route("/equipment/categories", get(api::equipment::list_categories))
        .route(
            "/equipment/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::update_equipment)
                .delete(api::equipment::delete_equipment),
        )
        .route(
            "/equipment/:id/send-to-maintenance",
            post(api::equipment::send_to_maintenance),
        )
        .route(
            "/equipment/:id/return-from-maintenance",
            post(api::equipment::return_from_maintenance),
        )
        // Consumables
        .route(
            "/consumables",
            get(api::consumables::list_consumables).post(api::consumables::create_consumable),
        )
        .route(
            "/consumables/:id",
            get(api::consumables::get_consumable)
                .put(api::consumables::update_consumable)
                .delete(api::consumables::delete_consumable),
        )
        // Staff
        .route("/staff", get(api::staff::list_staff).post(api::staff::create_staff_member))
        .route(
            "/staff/:id",
            get(api::staff::get_staff_member)
                .put(api::staff::update_staff_member)
                .delete(api::staff::delete_staff_member),
        )
        // Vehicles
        .route(
            "/vehicles",
            get(api::vehicles::list_vehicles).post(api::vehicles::create_vehicle),
        )
        .route(
            "/vehicles/:id",
            get(api::vehicles::get_vehicle)
                .put(api::vehicles::update_vehicle)
                .delete(api::vehicles::delete_vehicle),
        )
        // Events
        .route("/events", get(api::events::list_events).post(api::events::create_event))
        .route(
            "/events/:id",
            get(api::events::get_event)
                .put(api::events::update_event)
                .delete(api::events::delete_event),
        )
        .route(
            "/events/:id/crew",
            get(api::events::get_crew).put(api::events::set_crew),
        )
        .route(
            "/events/:id/vehicles",
            get(api::events::get_vehicles).put(api::events::set_vehicles),
        )
        .route(
            "/events/:id/attendance",
            get(api::events::list_attendance).post(api::events::confirm_attendance),
        )
        .route(
            "/events/:id/photos",
            get(api::events::list_photos)
                .post(api::events::upload_photo)
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/events/:id/photos/:photo_id", delete(api::events::delete_photo))
        // Planned material
        .route(
            "/events/:id/materials",
            get(api::materials::list_materials).post(api::materials::add_material),
        )
        .route(
            "/events/:id/materials/:material_id",
            put(api::materials::update_material).delete(api::materials::delete_material),
        )
        .route(
            "/events/:id/materials/:material_id/review",
            post(api::materials::toggle_material_review),
        )
        .route(
            "/events/:id/materials/:material_id/resolve",
            post(api::materials::resolve_shortage),
        )
        .route(
            "/events/:id/consumables",
            get(api::materials::list_event_consumables).post(api::materials::add_event_consumable),
        )
        .route(
            "/events/:id/consumables/:consumable_line_id",
            put(api::materials::update_event_consumable)
                .delete(api::materials::delete_event_consumable),
        )
        .route(
            "/events/:id/consumables/:consumable_line_id/review",
            post(api::materials::toggle_consumable_review),
        )
        // Workflow
        .route("/events/:id/submit-for-review", post(api::workflow::submit_for_review))
        .route("/events/:id/approve", post(api::workflow::approve_list))
        .route(
            "/events/:id/return-for-correction",
            post(api::workflow::return_for_correction),
        )
        .route("/events/:id/departure", post(api::workflow::record_departure))
        .route("/events/:id/return", post(api::workflow::record_return))
        .route("/events/:id/reinforcement", post(api::workflow::add_reinforcement))
        .route("/events/:id/cancel", post(api::workflow::cancel_event))
        .route("/events/:id/clone", post(api::workflow::clone_event))
        .route(
            "/events/:id/addenda",
            get(api::addenda::list_addenda).post(api::addenda::create_addendum),
        )
        // Reports
        .route("/events/:id/report", get(api::reports::event_report))
        .route("/events/:id/dispatch-guide", post(api::reports::dispatch_guide))
        .route(
            "/events/:id/reinforcement-guide",
            post(api::reports::reinforcement_guide),
        )
        .route("/events/:id/damage-report", get(api::reports::damage_report))
        .route("/reports/recent-damages", get(api::reports::recent_damages))
        .route("/dashboard", get(api::reports::dashboard))
        // Maintenance
        .route("/maintenance", get(api::maintenance::list_open))
        .route("/maintenance/history", get(api::maintenance::list_history))
        .route("/maintenance/:id", get(api::maintenance::get_record))
        .route("/maintenance/:id/status", put(api::maintenance::update_status))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
