//! Consumable API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::consumable::{CreateConsumable, Consumable, UpdateConsumable},
};

use super::AuthenticatedUser;

/// Consumable list
#[utoipa::path(
    get,
    path = "/consumables",
    tag = "consumables",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Consumable list", body = Vec<Consumable>)
    )
)]
pub async fn list_consumables(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Consumable>>> {
    let rows = state.services.consumables.list().await?;
    Ok(Json(rows))
}

/// Get consumable by ID
#[utoipa::path(
    get,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    responses(
        (status = 200, description = "Consumable details", body = Consumable),
        (status = 404, description = "Consumable not found")
    )
)]
pub async fn get_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Consumable>> {
    let row = state.services.consumables.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create consumable
#[utoipa::path(
    post,
    path = "/consumables",
    tag = "consumables",
    security(("bearer_auth" = [])),
    request_body = CreateConsumable,
    responses(
        (status = 201, description = "Consumable created", body = Consumable),
        (status = 400, description = "Invalid data"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn create_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateConsumable>,
) -> AppResult<(StatusCode, Json<Consumable>)> {
    claims.require_inventory()?;
    let row = state.services.consumables.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update consumable
#[utoipa::path(
    put,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    request_body = UpdateConsumable,
    responses(
        (status = 200, description = "Consumable updated", body = Consumable)
    )
)]
pub async fn update_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateConsumable>,
) -> AppResult<Json<Consumable>> {
    claims.require_inventory()?;
    let row = state.services.consumables.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete consumable
#[utoipa::path(
    delete,
    path = "/consumables/{id}",
    tag = "consumables",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Consumable ID")),
    responses(
        (status = 204, description = "Consumable deleted"),
        (status = 409, description = "Consumable is still referenced")
    )
)]
pub async fn delete_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_inventory()?;
    state.services.consumables.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
