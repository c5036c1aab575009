//! Event aggregate service: header, roster, attendance and photos

use std::path::PathBuf;

use validator::Validate;

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceConfirmation, ConfirmAttendance},
        event::{CreateEvent, Event, EventDetails, EventQuery, EventShort, SetCrew, SetVehicles, UpdateEvent},
        material::MaterialDetails,
        photo::Photo,
        staff::Staff,
        vehicle::Vehicle,
    },
    repository::Repository,
    workflow,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    media: MediaConfig,
}

impl EventsService {
    pub fn new(repository: Repository, media: MediaConfig) -> Self {
        Self { repository, media }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<EventShort>, i64)> {
        self.repository.events.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Event> {
        self.repository.events.get_by_id(id).await
    }

    /// Event with everything attached to it
    pub async fn get_details(&self, id: i32) -> AppResult<EventDetails> {
        let event = self.repository.events.get_by_id(id).await?;
        let client = self.repository.clients.get_by_id(event.client_id).await?;

        let team_leader = match event.team_leader_id {
            Some(staff_id) => match self.repository.staff.get_by_id(staff_id).await {
                Ok(staff) => Some(staff),
                Err(AppError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        let lines = self.repository.materials.list_for_event(id).await?;
        let returns = self.repository.materials.returns_for_event(id).await?;
        let materials = lines
            .into_iter()
            .map(|material| {
                let returns = returns
                    .iter()
                    .filter(|r| r.material_id == material.id)
                    .cloned()
                    .collect();
                MaterialDetails { material, returns }
            })
            .collect();

        Ok(EventDetails {
            crew: self.repository.events.crew(id).await?,
            vehicles: self.repository.events.vehicles(id).await?,
            consumables: self.repository.materials.consumables_for_event(id).await?,
            photos: self.repository.photos.list_for_event(id).await?,
            attendance: self.repository.attendance.list_for_event(id).await?,
            addenda: self.repository.addenda.list_for_event(id).await?,
            has_damage: self.repository.events.has_damage(id).await?,
            event,
            client,
            team_leader,
            materials,
        })
    }

    pub async fn create(&self, data: &CreateEvent, created_by: i32) -> AppResult<Event> {
        data.validate()?;
        workflow::check_dates(data.start_date, data.end_date)?;
        let event = self.repository.events.create(data, created_by).await?;
        tracing::info!("Created event {} for client {}", event.id, event.client_id);
        Ok(event)
    }

    pub async fn update(&self, id: i32, data: &UpdateEvent) -> AppResult<Event> {
        data.validate()?;
        self.repository.events.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let photos = self.repository.photos.list_for_event(id).await?;
        self.repository.events.delete(id).await?;
        for photo in &photos {
            self.remove_file(&photo.file_name).await;
        }
        tracing::info!("Deleted event {}", id);
        Ok(())
    }

    pub async fn crew(&self, id: i32) -> AppResult<Vec<Staff>> {
        self.repository.events.get_by_id(id).await?;
        self.repository.events.crew(id).await
    }

    pub async fn set_crew(&self, id: i32, data: &SetCrew) -> AppResult<Vec<Staff>> {
        let staff_ids = data
            .staff_ids
            .as_deref()
            .ok_or_else(|| AppError::Validation("staff_ids is required".to_string()))?;
        let crew = self.repository.events.set_crew(id, staff_ids).await?;
        tracing::info!("Event {} crew set to {} member(s)", id, crew.len());
        Ok(crew)
    }

    pub async fn vehicles(&self, id: i32) -> AppResult<Vec<Vehicle>> {
        self.repository.events.get_by_id(id).await?;
        self.repository.events.vehicles(id).await
    }

    pub async fn set_vehicles(&self, id: i32, data: &SetVehicles) -> AppResult<Vec<Vehicle>> {
        let vehicle_ids = data
            .vehicle_ids
            .as_deref()
            .ok_or_else(|| AppError::Validation("vehicle_ids is required".to_string()))?;
        let vehicles = self.repository.events.set_vehicles(id, vehicle_ids).await?;
        tracing::info!("Event {} vehicles set to {} vehicle(s)", id, vehicles.len());
        Ok(vehicles)
    }

    pub async fn attendance(&self, id: i32) -> AppResult<Vec<AttendanceConfirmation>> {
        self.repository.events.get_by_id(id).await?;
        self.repository.attendance.list_for_event(id).await
    }

    pub async fn confirm_attendance(&self, id: i32, data: &ConfirmAttendance) -> AppResult<AttendanceConfirmation> {
        self.repository.events.get_by_id(id).await?;
        let confirmation = self
            .repository
            .attendance
            .confirm(id, data.staff_id, data.party)
            .await?;
        tracing::info!(
            "Attendance of staff {} on event {} confirmed by {}",
            data.staff_id,
            id,
            data.party
        );
        Ok(confirmation)
    }

    pub async fn photos(&self, id: i32) -> AppResult<Vec<Photo>> {
        self.repository.events.get_by_id(id).await?;
        self.repository.photos.list_for_event(id).await
    }

    /// Store an uploaded photo under the media root
    pub async fn add_photo(
        &self,
        id: i32,
        original_name: Option<&str>,
        bytes: &[u8],
        description: Option<&str>,
    ) -> AppResult<Photo> {
        self.repository.events.get_by_id(id).await?;
        if bytes.is_empty() {
            return Err(AppError::Validation("The uploaded file is empty".to_string()));
        }

        let file_name = stored_file_name(id, original_name);
        let dir = PathBuf::from(&self.media.root);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store photo: {}", e)))?;

        let photo = match self.repository.photos.create(id, &file_name, description).await {
            Ok(photo) => photo,
            Err(e) => {
                self.remove_file(&file_name).await;
                return Err(e);
            }
        };
        tracing::info!("Stored photo {} for event {}", photo.file_name, id);
        Ok(photo)
    }

    pub async fn delete_photo(&self, id: i32, photo_id: i32) -> AppResult<()> {
        let photo = self.repository.photos.delete(id, photo_id).await?;
        self.remove_file(&photo.file_name).await;
        Ok(())
    }

    async fn remove_file(&self, file_name: &str) {
        let path = PathBuf::from(&self.media.root).join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Unique file name that keeps the original extension
fn stored_file_name(event_id: i32, original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    let stem = format!("event_{}_{}", event_id, uuid::Uuid::new_v4().simple());
    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_extension() {
        let name = stored_file_name(4, Some("Stage Left.JPG"));
        assert!(name.starts_with("event_4_"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_stored_file_name_drops_suspicious_extension() {
        assert!(!stored_file_name(4, Some("a.../../etc")).contains('/'));
        assert!(!stored_file_name(4, None).contains('.'));
        assert_ne!(stored_file_name(4, None), stored_file_name(4, None));
    }
}
