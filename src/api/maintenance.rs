//! Maintenance record endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{MaintenanceDetails, MaintenanceRecord, UpdateMaintenanceStatus},
};

use super::AuthenticatedUser;

/// Records still open, newest first
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open maintenance records", body = Vec<MaintenanceRecord>)
    )
)]
pub async fn list_open(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    let records = state.services.maintenance.list_open().await?;
    Ok(Json(records))
}

/// Repaired records, most recently closed first
#[utoipa::path(
    get,
    path = "/maintenance/history",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Repaired records", body = Vec<MaintenanceRecord>)
    )
)]
pub async fn list_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    let records = state.services.maintenance.list_repaired().await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Record with its status history", body = MaintenanceDetails),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceDetails>> {
    let details = state.services.maintenance.get_details(id).await?;
    Ok(Json(details))
}

/// Change the status of a record; REPAIRED moves one unit back to stock
#[utoipa::path(
    put,
    path = "/maintenance/{id}/status",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    request_body = UpdateMaintenanceStatus,
    responses(
        (status = 200, description = "Updated record", body = MaintenanceDetails),
        (status = 400, description = "Missing status")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateMaintenanceStatus>,
) -> AppResult<Json<MaintenanceDetails>> {
    claims.require_maintenance()?;
    let details = state
        .services
        .maintenance
        .update_status(id, &data, claims.user_id)
        .await?;
    Ok(Json(details))
}
