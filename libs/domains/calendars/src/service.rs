//! Calendar Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CalendarError, CalendarResult};
use crate::models::{Calendar, CalendarFilter, CreateCalendar, UpdateCalendar};
use crate::repository::CalendarRepository;

/// Calendar service: validation and not-found handling over a repository
pub struct CalendarService<R: CalendarRepository> {
    repository: Arc<R>,
}

impl<R: CalendarRepository> CalendarService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(calendar_title = %input.title))]
    pub async fn create_calendar(&self, input: CreateCalendar) -> CalendarResult<Calendar> {
        input
            .validate()
            .map_err(|e| CalendarError::Validation(e.to_string()))?;

        self.repository.insert(Calendar::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_calendar(&self, id: Uuid) -> CalendarResult<Calendar> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CalendarError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_calendars(&self, filter: CalendarFilter) -> CalendarResult<Vec<Calendar>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_calendar(&self, id: Uuid, input: UpdateCalendar) -> CalendarResult<Calendar> {
        input
            .validate()
            .map_err(|e| CalendarError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(CalendarError::NotFound(id))
    }

    /// Delete a calendar. Children and events keep pointing at it.
    #[instrument(skip(self))]
    pub async fn delete_calendar(&self, id: Uuid) -> CalendarResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CalendarError::NotFound(id));
        }
        Ok(())
    }

    /// Direct children of `id`. An empty result is reported as not found.
    #[instrument(skip(self))]
    pub async fn subcalendars(&self, id: Uuid) -> CalendarResult<Vec<Calendar>> {
        let children = self.repository.children_of(id).await?;
        if children.is_empty() {
            return Err(CalendarError::NoSubcalendars(id));
        }
        Ok(children)
    }
}

impl<R: CalendarRepository> Clone for CalendarService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
