//! Vehicle API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::vehicle::{CreateVehicle, Vehicle, UpdateVehicle},
};

use super::AuthenticatedUser;

/// Vehicle list
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Vehicle list", body = Vec<Vehicle>)
    )
)]
pub async fn list_vehicles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Vehicle>>> {
    let rows = state.services.vehicles.list().await?;
    Ok(Json(rows))
}

/// Get vehicle by ID
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vehicle>> {
    let row = state.services.vehicles.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create vehicle
#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicle,
    responses(
        (status = 201, description = "Vehicle created", body = Vehicle),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    claims.require_planning()?;
    let row = state.services.vehicles.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update vehicle
#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicle,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle)
    )
)]
pub async fn update_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    claims.require_planning()?;
    let row = state.services.vehicles.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete vehicle
#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    tag = "vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 409, description = "Vehicle is still referenced")
    )
)]
pub async fn delete_vehicle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.vehicles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
