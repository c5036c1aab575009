//! Printable reports and dashboard aggregates

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::report::{DashboardStats, GuideItem, RecentDamage},
    reports::{layout, pdf, ReportDocument},
    repository::Repository,
    services::events::EventsService,
};

const RECENT_DAMAGES: i64 = 10;
const UPCOMING_EVENTS: i64 = 5;

/// Rendered PDF with its attachment name
pub struct RenderedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    events: EventsService,
}

impl ReportsService {
    pub fn new(repository: Repository, events: EventsService) -> Self {
        Self { repository, events }
    }

    fn render(document: ReportDocument) -> AppResult<RenderedReport> {
        let bytes = pdf::render(&document)?;
        tracing::info!("Generated {} ({} bytes)", document.file_name, bytes.len());
        Ok(RenderedReport {
            file_name: document.file_name,
            bytes,
        })
    }

    fn check_items(items: &[GuideItem]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation("No items were given for the guide".to_string()));
        }
        if items.iter().any(|i| i.model.trim().is_empty() || i.quantity <= 0) {
            return Err(AppError::Validation(
                "Every guide item needs a model and a positive quantity".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn event_report(&self, event_id: i32) -> AppResult<RenderedReport> {
        let details = self.events.get_details(event_id).await?;
        Self::render(layout::event_report(&details))
    }

    pub async fn dispatch_guide(&self, event_id: i32, items: &[GuideItem]) -> AppResult<RenderedReport> {
        Self::check_items(items)?;
        let event = self.repository.events.get_by_id(event_id).await?;
        let client = self.repository.clients.get_by_id(event.client_id).await?;
        let consumables = self.repository.materials.consumables_for_event(event_id).await?;
        Self::render(layout::dispatch_guide(&event, &client, items, &consumables, Utc::now()))
    }

    pub async fn reinforcement_guide(&self, event_id: i32, items: &[GuideItem]) -> AppResult<RenderedReport> {
        Self::check_items(items)?;
        let event = self.repository.events.get_by_id(event_id).await?;
        let client = self.repository.clients.get_by_id(event.client_id).await?;
        Self::render(layout::reinforcement_guide(&event, &client, items, Utc::now()))
    }

    pub async fn damage_report(&self, event_id: i32) -> AppResult<RenderedReport> {
        let event = self.repository.events.get_by_id(event_id).await?;
        let damages = self.repository.reports.event_damages(event_id).await?;
        if damages.is_empty() {
            return Err(AppError::NotFound(
                "No damaged item was recorded for this operation".to_string(),
            ));
        }
        let client = self.repository.clients.get_by_id(event.client_id).await?;
        Self::render(layout::damage_report(&event, &client, &damages, Utc::now()))
    }

    pub async fn recent_damages(&self) -> AppResult<Vec<RecentDamage>> {
        self.repository.reports.recent_damages(RECENT_DAMAGES).await
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let (total_in_stock, total_in_maintenance) = self.repository.equipment.totals().await?;
        let upcoming_events = self
            .repository
            .events
            .upcoming(Utc::now().date_naive(), UPCOMING_EVENTS)
            .await?;
        Ok(DashboardStats {
            total_in_stock,
            total_in_maintenance,
            upcoming_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_items_are_checked() {
        assert!(ReportsService::check_items(&[]).is_err());
        let blank = GuideItem { model: " ".to_string(), quantity: 1 };
        assert!(ReportsService::check_items(&[blank]).is_err());
        let ok = GuideItem { model: "Truss 2m".to_string(), quantity: 4 };
        assert!(ReportsService::check_items(&[ok]).is_ok());
    }
}
