//! Novalite Rental Operations Server
//!
//! REST JSON API for an audiovisual and lighting rental company: client,
//! inventory, staff and fleet registries, the event workflow from planning
//! to return, equipment maintenance and PDF reports.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
