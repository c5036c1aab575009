//! Event workflow actions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        event::Event,
        workflow::{
            CancelRequest, CloneRequest, CorrectionRequest, DepartureRequest, ReinforcementRequest,
            ReturnRequest,
        },
    },
};

use super::AuthenticatedUser;

/// Send the material list to logistics for review
#[utoipa::path(
    post,
    path = "/events/{id}/submit-for-review",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "PLANNING -> AWAITING_REVIEW", body = Event),
        (status = 409, description = "Event is not in planning")
    )
)]
pub async fn submit_for_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Event>> {
    claims.require_planning()?;
    let event = state.services.operations.submit_for_review(id).await?;
    Ok(Json(event))
}

/// Approve the reviewed material list
#[utoipa::path(
    post,
    path = "/events/{id}/approve",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "AWAITING_REVIEW -> AWAITING_DEPARTURE", body = Event),
        (status = 409, description = "Event is not awaiting review"),
        (status = 422, description = "Unreviewed lines or insufficient stock")
    )
)]
pub async fn approve_list(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Event>> {
    claims.require_logistics()?;
    let event = state.services.operations.approve_list(id).await?;
    Ok(Json(event))
}

/// Send the material list back to planning with a note
#[utoipa::path(
    post,
    path = "/events/{id}/return-for-correction",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CorrectionRequest,
    responses(
        (status = 200, description = "AWAITING_REVIEW -> PLANNING", body = Event),
        (status = 400, description = "Missing note"),
        (status = 409, description = "Event is not awaiting review")
    )
)]
pub async fn return_for_correction(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CorrectionRequest>,
) -> AppResult<Json<Event>> {
    claims.require_logistics()?;
    let event = state.services.operations.return_for_correction(id, &data).await?;
    Ok(Json(event))
}

/// Check material out of the warehouse
#[utoipa::path(
    post,
    path = "/events/{id}/departure",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = DepartureRequest,
    responses(
        (status = 200, description = "Event after the departure", body = Event),
        (status = 409, description = "Departure not allowed in this status"),
        (status = 422, description = "Quantity above what remains or what is in stock")
    )
)]
pub async fn record_departure(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<DepartureRequest>,
) -> AppResult<Json<Event>> {
    claims.require_logistics()?;
    let event = state.services.operations.record_departure(id, &data).await?;
    Ok(Json(event))
}

/// Check material back in
#[utoipa::path(
    post,
    path = "/events/{id}/return",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Event after the return", body = Event),
        (status = 409, description = "Event is not in progress"),
        (status = 422, description = "Quantity above what is outstanding")
    )
)]
pub async fn record_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReturnRequest>,
) -> AppResult<Json<Event>> {
    claims.require_logistics()?;
    let event = state.services.operations.record_return(id, &data).await?;
    Ok(Json(event))
}

/// Add and check out extra material during an event
#[utoipa::path(
    post,
    path = "/events/{id}/reinforcement",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = ReinforcementRequest,
    responses(
        (status = 200, description = "Event after the reinforcement", body = Event),
        (status = 404, description = "Unknown equipment"),
        (status = 409, description = "Event is not in progress"),
        (status = 422, description = "Insufficient stock")
    )
)]
pub async fn add_reinforcement(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReinforcementRequest>,
) -> AppResult<Json<Event>> {
    claims.require_logistics()?;
    let event = state.services.operations.add_reinforcement(id, &data).await?;
    Ok(Json(event))
}

/// Cancel an event (administrators, password required)
#[utoipa::path(
    post,
    path = "/events/{id}/cancel",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Cancelled event", body = Event),
        (status = 400, description = "Missing reason or password"),
        (status = 403, description = "Not an administrator or wrong password"),
        (status = 409, description = "Event already left the warehouse")
    )
)]
pub async fn cancel_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CancelRequest>,
) -> AppResult<Json<Event>> {
    let event = state.services.operations.cancel(id, &data, &claims).await?;
    Ok(Json(event))
}

/// Copy an event header, its material lines and crew to new dates
#[utoipa::path(
    post,
    path = "/events/{id}/clone",
    tag = "workflow",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Source event ID")),
    request_body = CloneRequest,
    responses(
        (status = 201, description = "New event in planning", body = Event),
        (status = 400, description = "Missing start date")
    )
)]
pub async fn clone_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CloneRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    claims.require_planning()?;
    let event = state
        .services
        .operations
        .clone_event(id, &data, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}
