//! Event Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::calendar_directory::CalendarDirectory;
use crate::error::{EventError, EventResult};
use crate::image_host::{ImageHost, ImageUpload};
use crate::models::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::repository::EventRepository;

/// Event service
///
/// Owns the calendar-hierarchy aggregation: events of a calendar are the events
/// of the calendar itself plus those of its direct subcalendars.
pub struct EventService<R: EventRepository, D: CalendarDirectory> {
    repository: Arc<R>,
    directory: Arc<D>,
    images: Option<Arc<dyn ImageHost>>,
}

impl<R: EventRepository, D: CalendarDirectory> EventService<R, D> {
    pub fn new(repository: R, directory: D) -> Self {
        Self {
            repository: Arc::new(repository),
            directory: Arc::new(directory),
            images: None,
        }
    }

    /// Enable image uploads for multipart creates
    pub fn with_image_host(mut self, host: impl ImageHost + 'static) -> Self {
        self.images = Some(Arc::new(host));
        self
    }

    #[instrument(skip(self, input), fields(calendar_id = %input.calendar_id))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository.insert(Event::new(input)).await
    }

    /// Upload `images`, append their URLs to the attachments, then create.
    ///
    /// Nothing is stored if any upload fails.
    #[instrument(skip(self, input, images), fields(images = images.len()))]
    pub async fn create_event_with_images(
        &self,
        mut input: CreateEvent,
        images: Vec<ImageUpload>,
    ) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        if !images.is_empty() {
            let host = self.images.as_ref().ok_or_else(|| {
                EventError::ImageHost("Image uploads are not configured".to_string())
            })?;

            for image in images {
                let url = host.upload(image).await?;
                input.attachments.images.push(url);
            }
        }

        self.repository.insert(Event::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: Uuid) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// Delete an event. Its comments are left in place.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> EventResult<()> {
        if !self.repository.delete(id).await? {
            return Err(EventError::NotFound(id));
        }
        Ok(())
    }

    /// Events of `calendar_id` and of its direct subcalendars (one level only).
    ///
    /// Fails as a whole when the calendar service is unavailable.
    #[instrument(skip(self))]
    pub async fn events_for_calendar(&self, calendar_id: Uuid) -> EventResult<Vec<Event>> {
        let children = self.directory.subcalendar_ids(calendar_id).await?;

        let mut ids = Vec::with_capacity(children.len() + 1);
        ids.push(calendar_id);
        for child in children {
            if !ids.contains(&child) {
                ids.push(child);
            }
        }

        tracing::debug!(calendars = ids.len(), "Expanding calendar hierarchy");
        self.repository.list_by_calendars(ids).await
    }
}

impl<R: EventRepository, D: CalendarDirectory> Clone for EventService<R, D> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
            images: self.images.clone(),
        }
    }
}
