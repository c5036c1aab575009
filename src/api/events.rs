//! Event endpoints: header, roster, attendance and photos

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceConfirmation, ConfirmAttendance},
        event::{CreateEvent, Event, EventDetails, EventQuery, EventShort, SetCrew, SetVehicles, UpdateEvent},
        photo::Photo,
        staff::Staff,
        vehicle::Vehicle,
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Multipart body of a photo upload
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PhotoUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    description: Option<String>,
}

/// List events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Events, most recent start date first", body = PaginatedResponse<EventShort>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<PaginatedResponse<EventShort>>> {
    let (items, total) = state.services.events.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(50).clamp(1, 200),
    }))
}

/// Get an event with everything attached to it
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventDetails),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EventDetails>> {
    let details = state.services.events.get_details(id).await?;
    Ok(Json(details))
}

/// Create an event in planning
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    claims.require_planning()?;
    let event = state.services.events.create(&data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event header while it is in planning
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 409, description = "Event no longer in planning")
    )
)]
pub async fn update_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    claims.require_planning()?;
    let event = state.services.events.update(id, &data).await?;
    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted")
    )
)]
pub async fn delete_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Crew of an event
#[utoipa::path(
    get,
    path = "/events/{id}/crew",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Crew members", body = Vec<Staff>)
    )
)]
pub async fn get_crew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Staff>>> {
    let crew = state.services.events.crew(id).await?;
    Ok(Json(crew))
}

/// Replace the crew of an event
#[utoipa::path(
    put,
    path = "/events/{id}/crew",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = SetCrew,
    responses(
        (status = 200, description = "New crew", body = Vec<Staff>),
        (status = 400, description = "Missing staff_ids or unknown staff member")
    )
)]
pub async fn set_crew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<SetCrew>,
) -> AppResult<Json<Vec<Staff>>> {
    claims.require_planning()?;
    let crew = state.services.events.set_crew(id, &data).await?;
    Ok(Json(crew))
}

/// Vehicles of an event
#[utoipa::path(
    get,
    path = "/events/{id}/vehicles",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Assigned vehicles", body = Vec<Vehicle>)
    )
)]
pub async fn get_vehicles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = state.services.events.vehicles(id).await?;
    Ok(Json(vehicles))
}

/// Replace the vehicles of an event
#[utoipa::path(
    put,
    path = "/events/{id}/vehicles",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = SetVehicles,
    responses(
        (status = 200, description = "New vehicle list", body = Vec<Vehicle>),
        (status = 400, description = "Missing vehicle_ids or unknown vehicle")
    )
)]
pub async fn set_vehicles(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<SetVehicles>,
) -> AppResult<Json<Vec<Vehicle>>> {
    claims.require_planning()?;
    let vehicles = state.services.events.set_vehicles(id, &data).await?;
    Ok(Json(vehicles))
}

/// Attendance confirmations of an event
#[utoipa::path(
    get,
    path = "/events/{id}/attendance",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Confirmations", body = Vec<AttendanceConfirmation>)
    )
)]
pub async fn list_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<AttendanceConfirmation>>> {
    let rows = state.services.events.attendance(id).await?;
    Ok(Json(rows))
}

/// Confirm the attendance of a crew member, as leader or as the member
#[utoipa::path(
    post,
    path = "/events/{id}/attendance",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = ConfirmAttendance,
    responses(
        (status = 200, description = "Confirmation state", body = AttendanceConfirmation),
        (status = 400, description = "Staff member not in the crew")
    )
)]
pub async fn confirm_attendance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ConfirmAttendance>,
) -> AppResult<Json<AttendanceConfirmation>> {
    let row = state.services.events.confirm_attendance(id, &data).await?;
    Ok(Json(row))
}

/// Photos of an event
#[utoipa::path(
    get,
    path = "/events/{id}/photos",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Photos", body = Vec<Photo>)
    )
)]
pub async fn list_photos(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Photo>>> {
    let photos = state.services.events.photos(id).await?;
    Ok(Json(photos))
}

/// Upload a photo (multipart fields `file` and optional `description`)
#[utoipa::path(
    post,
    path = "/events/{id}/photos",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body(content = PhotoUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = Photo),
        (status = 400, description = "Missing or invalid file")
    )
)]
pub async fn upload_photo(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Photo>)> {
    claims.require_planning()?;

    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let mime = field.content_type().unwrap_or("application/octet-stream").to_string();
                if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
                    return Err(AppError::Validation(format!("Unsupported file type: {}", mime)));
                }
                let original = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Read error: {}", e)))?;
                file = Some((original, bytes.to_vec()));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Read error: {}", e)))?;
                description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (original, bytes) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let photo = state
        .services
        .events
        .add_photo(id, original.as_deref(), &bytes, description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// Delete a photo and its file
#[utoipa::path(
    delete,
    path = "/events/{id}/photos/{photo_id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Event ID"),
        ("photo_id" = i32, Path, description = "Photo ID")
    ),
    responses(
        (status = 204, description = "Photo deleted")
    )
)]
pub async fn delete_photo(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, photo_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    claims.require_planning()?;
    state.services.events.delete_photo(id, photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
