use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::{Event, EventFilter, UpdateEvent};

/// Repository trait for event persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: Event) -> EventResult<Event>;

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Events matching every supplied predicate
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    /// Events owned by any of `calendar_ids`
    async fn list_by_calendars(&self, calendar_ids: Vec<Uuid>) -> EventResult<Vec<Event>>;

    /// Apply a partial update, returning the post-image or `None` if the id is unknown
    async fn update(&self, id: Uuid, update: UpdateEvent) -> EventResult<Option<Event>>;

    async fn delete(&self, id: Uuid) -> EventResult<bool>;
}
