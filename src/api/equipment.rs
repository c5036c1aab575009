//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        enums::{Choice, EquipmentCategory},
        equipment::{
            CreateEquipment, Equipment, EquipmentQuery, ReturnFromMaintenance, SendToMaintenance,
            UpdateEquipment,
        },
    },
};

use super::AuthenticatedUser;

/// List equipment, optionally filtered by text and category
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list(&query).await?;
    Ok(Json(equipment))
}

/// Equipment categories with their labels
#[utoipa::path(
    get,
    path = "/equipment/categories",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category choices", body = Vec<Choice>)
    )
)]
pub async fn list_categories(AuthenticatedUser(_claims): AuthenticatedUser) -> Json<Vec<Choice>> {
    Json(EquipmentCategory::choices())
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_inventory()?;
    let equipment = state.services.equipment.create(&data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_inventory()?;
    let equipment = state.services.equipment.update(id, &data).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_inventory()?;
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Send units from stock to maintenance
#[utoipa::path(
    post,
    path = "/equipment/{id}/send-to-maintenance",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = SendToMaintenance,
    responses(
        (status = 200, description = "Counters after the transfer", body = Equipment),
        (status = 400, description = "Missing problem description"),
        (status = 422, description = "Quantity not available in stock")
    )
)]
pub async fn send_to_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<SendToMaintenance>,
) -> AppResult<Json<Equipment>> {
    claims.require_inventory()?;
    let equipment = state.services.equipment.send_to_maintenance(id, &data).await?;
    Ok(Json(equipment))
}

/// Bring units back from maintenance
#[utoipa::path(
    post,
    path = "/equipment/{id}/return-from-maintenance",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = ReturnFromMaintenance,
    responses(
        (status = 200, description = "Counters after the transfer", body = Equipment),
        (status = 422, description = "Quantity not in maintenance")
    )
)]
pub async fn return_from_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReturnFromMaintenance>,
) -> AppResult<Json<Equipment>> {
    claims.require_inventory()?;
    let equipment = state.services.equipment.return_from_maintenance(id, &data).await?;
    Ok(Json(equipment))
}
