//! Addenda: material added to an event after planning

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::addendum::{AddendumDetails, CreateAddendum},
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/events/{id}/addenda",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Addenda with their lines", body = Vec<AddendumDetails>)
    )
)]
pub async fn list_addenda(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<AddendumDetails>>> {
    state.services.events.get_by_id(id).await?;
    let addenda = state.services.operations.addenda(id).await?;
    Ok(Json(addenda))
}

/// Record an addendum; its quantities are added to the planned lines
#[utoipa::path(
    post,
    path = "/events/{id}/addenda",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreateAddendum,
    responses(
        (status = 201, description = "Addendum recorded", body = AddendumDetails),
        (status = 400, description = "Missing description or lines"),
        (status = 409, description = "Event is finished or cancelled")
    )
)]
pub async fn create_addendum(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CreateAddendum>,
) -> AppResult<(StatusCode, Json<AddendumDetails>)> {
    claims.require_planning()?;
    let addendum = state
        .services
        .operations
        .add_addendum(id, &data, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(addendum)))
}
