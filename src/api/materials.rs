//! Material lines and consumables planned for an event

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::material::{
        CreateEventConsumable, CreateMaterial, EventConsumable, PlannedMaterial, ResolveShortage,
        UpdateEventConsumable, UpdateMaterial,
    },
};

use super::AuthenticatedUser;

/// Material lines of an event
#[utoipa::path(
    get,
    path = "/events/{id}/materials",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Planned material", body = Vec<PlannedMaterial>)
    )
)]
pub async fn list_materials(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<PlannedMaterial>>> {
    let lines = state.services.materials.list(id).await?;
    Ok(Json(lines))
}

/// Add a material line; the supply status is computed from stock
#[utoipa::path(
    post,
    path = "/events/{id}/materials",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreateMaterial,
    responses(
        (status = 201, description = "Line added", body = PlannedMaterial),
        (status = 409, description = "Event no longer in planning")
    )
)]
pub async fn add_material(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CreateMaterial>,
) -> AppResult<(StatusCode, Json<PlannedMaterial>)> {
    claims.require_planning()?;
    let line = state.services.materials.add_line(id, &data).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[utoipa::path(
    put,
    path = "/events/{id}/materials/{material_id}",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("material_id" = i32, Path, description = "Material line ID")
    ),
    request_body = UpdateMaterial,
    responses(
        (status = 200, description = "Line updated", body = PlannedMaterial)
    )
)]
pub async fn update_material(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, material_id)): Path<(i32, i32)>,
    Json(data): Json<UpdateMaterial>,
) -> AppResult<Json<PlannedMaterial>> {
    claims.require_planning()?;
    let line = state.services.materials.update_line(id, material_id, &data).await?;
    Ok(Json(line))
}

#[utoipa::path(
    delete,
    path = "/events/{id}/materials/{material_id}",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("material_id" = i32, Path, description = "Material line ID")
    ),
    responses(
        (status = 204, description = "Line deleted")
    )
)]
pub async fn delete_material(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, material_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.materials.delete_line(id, material_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the reviewed flag of a line
#[utoipa::path(
    post,
    path = "/events/{id}/materials/{material_id}/review",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("material_id" = i32, Path, description = "Material line ID")
    ),
    responses(
        (status = 200, description = "Line with its new flag", body = PlannedMaterial)
    )
)]
pub async fn toggle_material_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, material_id)): Path<(i32, i32)>,
) -> AppResult<Json<PlannedMaterial>> {
    claims.require_logistics()?;
    let line = state.services.materials.toggle_review(id, material_id).await?;
    Ok(Json(line))
}

/// Record how a pending shortage is covered
#[utoipa::path(
    post,
    path = "/events/{id}/materials/{material_id}/resolve",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("material_id" = i32, Path, description = "Material line ID")
    ),
    request_body = ResolveShortage,
    responses(
        (status = 200, description = "Resolved line", body = PlannedMaterial),
        (status = 400, description = "Invalid solution"),
        (status = 409, description = "Line has no pending shortage")
    )
)]
pub async fn resolve_shortage(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, material_id)): Path<(i32, i32)>,
    Json(data): Json<ResolveShortage>,
) -> AppResult<Json<PlannedMaterial>> {
    claims.require_logistics()?;
    let line = state.services.materials.resolve(id, material_id, &data).await?;
    Ok(Json(line))
}

/// Consumables planned for an event
#[utoipa::path(
    get,
    path = "/events/{id}/consumables",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Planned consumables", body = Vec<EventConsumable>)
    )
)]
pub async fn list_event_consumables(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<EventConsumable>>> {
    let rows = state.services.materials.consumables(id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/events/{id}/consumables",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreateEventConsumable,
    responses(
        (status = 201, description = "Consumable added", body = EventConsumable),
        (status = 409, description = "Consumable already planned for this event")
    )
)]
pub async fn add_event_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<CreateEventConsumable>,
) -> AppResult<(StatusCode, Json<EventConsumable>)> {
    claims.require_planning()?;
    let row = state.services.materials.add_consumable(id, &data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/events/{id}/consumables/{consumable_line_id}",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("consumable_line_id" = i32, Path, description = "Event consumable ID")
    ),
    request_body = UpdateEventConsumable,
    responses(
        (status = 200, description = "Quantity updated", body = EventConsumable)
    )
)]
pub async fn update_event_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, line_id)): Path<(i32, i32)>,
    Json(data): Json<UpdateEventConsumable>,
) -> AppResult<Json<EventConsumable>> {
    claims.require_planning()?;
    let row = state.services.materials.update_consumable(id, line_id, &data).await?;
    Ok(Json(row))
}

#[utoipa::path(
    delete,
    path = "/events/{id}/consumables/{consumable_line_id}",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("consumable_line_id" = i32, Path, description = "Event consumable ID")
    ),
    responses(
        (status = 204, description = "Consumable removed")
    )
)]
pub async fn delete_event_consumable(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, line_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.materials.delete_consumable(id, line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/events/{id}/consumables/{consumable_line_id}/review",
    tag = "materials",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("consumable_line_id" = i32, Path, description = "Event consumable ID")
    ),
    responses(
        (status = 200, description = "Consumable with its new flag", body = EventConsumable)
    )
)]
pub async fn toggle_consumable_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, line_id)): Path<(i32, i32)>,
) -> AppResult<Json<EventConsumable>> {
    claims.require_logistics()?;
    let row = state.services.materials.toggle_consumable_review(id, line_id).await?;
    Ok(Json(row))
}
