//! PDF reports, recent damages and dashboard

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::AppResult,
    models::report::{DashboardStats, GuideRequest, RecentDamage},
    services::reports::RenderedReport,
};

use super::AuthenticatedUser;

fn pdf_response(report: RenderedReport) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        report.bytes,
    )
        .into_response()
}

/// Full event report
#[utoipa::path(
    get,
    path = "/events/{id}/report",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn event_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let report = state.services.reports.event_report(id).await?;
    Ok(pdf_response(report))
}

/// Dispatch guide for the listed items
#[utoipa::path(
    post,
    path = "/events/{id}/dispatch-guide",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = GuideRequest,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, description = "No items")
    )
)]
pub async fn dispatch_guide(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<GuideRequest>,
) -> AppResult<Response> {
    let report = state.services.reports.dispatch_guide(id, &data.items).await?;
    Ok(pdf_response(report))
}

/// Reinforcement guide for the listed items
#[utoipa::path(
    post,
    path = "/events/{id}/reinforcement-guide",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = GuideRequest,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, description = "No items")
    )
)]
pub async fn reinforcement_guide(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<GuideRequest>,
) -> AppResult<Response> {
    let report = state.services.reports.reinforcement_guide(id, &data.items).await?;
    Ok(pdf_response(report))
}

/// Loss and damage report of an event
#[utoipa::path(
    get,
    path = "/events/{id}/damage-report",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "No damaged item recorded")
    )
)]
pub async fn damage_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let report = state.services.reports.damage_report(id).await?;
    Ok(pdf_response(report))
}

/// Latest damaged returns from finished events
#[utoipa::path(
    get,
    path = "/reports/recent-damages",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Up to ten damaged returns", body = Vec<RecentDamage>)
    )
)]
pub async fn recent_damages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RecentDamage>>> {
    let rows = state.services.reports.recent_damages().await?;
    Ok(Json(rows))
}

/// Stock totals and upcoming events
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStats)
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    let stats = state.services.reports.dashboard().await?;
    Ok(Json(stats))
}
