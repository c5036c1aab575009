//! Staff API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::staff::{CreateStaff, Staff, UpdateStaff},
};

use super::AuthenticatedUser;

/// Staff list
#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff list", body = Vec<Staff>)
    )
)]
pub async fn list_staff(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Staff>>> {
    let rows = state.services.staff.list().await?;
    Ok(Json(rows))
}

/// Get staff member by ID
#[utoipa::path(
    get,
    path = "/staff/{id}",
    tag = "staff",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member details", body = Staff),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Staff>> {
    let row = state.services.staff.get_by_id(id).await?;
    Ok(Json(row))
}

/// Create staff member
#[utoipa::path(
    post,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff member created", body = Staff),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_staff_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateStaff>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    claims.require_planning()?;
    let row = state.services.staff.create(&data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update staff member
#[utoipa::path(
    put,
    path = "/staff/{id}",
    tag = "staff",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Staff ID")),
    request_body = UpdateStaff,
    responses(
        (status = 200, description = "Staff member updated", body = Staff)
    )
)]
pub async fn update_staff_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateStaff>,
) -> AppResult<Json<Staff>> {
    claims.require_planning()?;
    let row = state.services.staff.update(id, &data).await?;
    Ok(Json(row))
}

/// Delete staff member
#[utoipa::path(
    delete,
    path = "/staff/{id}",
    tag = "staff",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Staff ID")),
    responses(
        (status = 204, description = "Staff member deleted"),
        (status = 409, description = "Staff member is still referenced")
    )
)]
pub async fn delete_staff_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.staff.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
