//! Event workflow transitions and stock movements

use crate::{
    error::{AppError, AppResult},
    models::{
        addendum::{AddendumDetails, CreateAddendum},
        event::Event,
        user::UserClaims,
        workflow::{CancelRequest, CloneRequest, CorrectionRequest, DepartureRequest, ReinforcementRequest, ReturnRequest},
    },
    repository::Repository,
    services::users::UsersService,
    workflow,
};

#[derive(Clone)]
pub struct OperationsService {
    repository: Repository,
    users: UsersService,
}

impl OperationsService {
    pub fn new(repository: Repository, users: UsersService) -> Self {
        Self { repository, users }
    }

    pub async fn submit_for_review(&self, id: i32) -> AppResult<Event> {
        let event = self.repository.operations.submit_for_review(id).await?;
        tracing::info!("Event {} submitted for review", id);
        Ok(event)
    }

    pub async fn approve_list(&self, id: i32) -> AppResult<Event> {
        let event = self.repository.operations.approve_list(id).await?;
        tracing::info!("Material list of event {} approved", id);
        Ok(event)
    }

    pub async fn return_for_correction(&self, id: i32, data: &CorrectionRequest) -> AppResult<Event> {
        let note = workflow::require_text(data.note.as_deref(), "Correction note")?;
        let event = self.repository.operations.return_for_correction(id, &note).await?;
        tracing::info!("Material list of event {} returned for correction", id);
        Ok(event)
    }

    pub async fn record_departure(&self, id: i32, data: &DepartureRequest) -> AppResult<Event> {
        let event = self.repository.operations.record_departure(id, &data.items).await?;
        tracing::info!(
            "Departure of {} line(s) recorded for event {}, now {}",
            data.items.len(),
            id,
            event.status
        );
        Ok(event)
    }

    pub async fn record_return(&self, id: i32, data: &ReturnRequest) -> AppResult<Event> {
        let event = self.repository.operations.record_return(id, &data.items).await?;
        tracing::info!(
            "Return of {} line(s) recorded for event {}, now {}",
            data.items.len(),
            id,
            event.status
        );
        Ok(event)
    }

    pub async fn add_reinforcement(&self, id: i32, data: &ReinforcementRequest) -> AppResult<Event> {
        let event = self.repository.operations.add_reinforcement(id, &data.items).await?;
        tracing::info!("Reinforcement of {} item(s) added to event {}", data.items.len(), id);
        Ok(event)
    }

    /// Administrators only, with the password entered again
    pub async fn cancel(&self, id: i32, data: &CancelRequest, claims: &UserClaims) -> AppResult<Event> {
        let reason = data.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let password = data.password.as_deref().filter(|p| !p.is_empty());
        let (reason, password) = match (reason, password) {
            (Some(reason), Some(password)) => (reason, password),
            _ => {
                return Err(AppError::BadRequest(
                    "A reason and the administrator password are required".to_string(),
                ))
            }
        };

        claims.require_admin()?;
        self.users.confirm_password(claims.user_id, password).await?;

        let event = self.repository.operations.cancel(id, reason).await?;
        tracing::info!("Event {} cancelled by {}: {}", id, claims.sub, reason);
        Ok(event)
    }

    pub async fn clone_event(&self, id: i32, data: &CloneRequest, user_id: i32) -> AppResult<Event> {
        let start_date = data
            .start_date
            .ok_or_else(|| AppError::Validation("start_date is required".to_string()))?;
        workflow::check_dates(start_date, data.end_date)?;

        let source = self.repository.events.get_by_id(id).await?;
        let name = workflow::clone_name(data.name.as_deref(), source.name.as_deref());

        let event = self
            .repository
            .operations
            .clone_event(id, &name, start_date, data.end_date, user_id)
            .await?;
        tracing::info!("Event {} cloned into {} ({})", id, event.id, name);
        Ok(event)
    }

    pub async fn addenda(&self, id: i32) -> AppResult<Vec<AddendumDetails>> {
        self.repository.addenda.list_for_event(id).await
    }

    pub async fn add_addendum(&self, id: i32, data: &CreateAddendum, user_id: i32) -> AppResult<AddendumDetails> {
        let description = workflow::require_text(data.description.as_deref(), "Description")?;
        if data.lines.is_empty() {
            return Err(AppError::Validation(
                "An addendum needs at least one line".to_string(),
            ));
        }

        let addendum_id = self
            .repository
            .operations
            .add_addendum(id, &description, &data.lines, user_id)
            .await?;
        tracing::info!("Addendum {} with {} line(s) added to event {}", addendum_id, data.lines.len(), id);

        self.repository
            .addenda
            .list_for_event(id)
            .await?
            .into_iter()
            .find(|a| a.addendum.id == addendum_id)
            .ok_or_else(|| AppError::Internal(format!("Addendum {} vanished after insert", addendum_id)))
    }
}
