use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CalendarResult;
use crate::models::{Calendar, CalendarFilter, UpdateCalendar};

/// Repository trait for calendar persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Insert a calendar and return it as stored
    async fn insert(&self, calendar: Calendar) -> CalendarResult<Calendar>;

    async fn get_by_id(&self, id: Uuid) -> CalendarResult<Option<Calendar>>;

    /// List calendars matching all supplied filters
    async fn list(&self, filter: CalendarFilter) -> CalendarResult<Vec<Calendar>>;

    /// Apply a partial update, returning the post-image or `None` if the id is unknown
    async fn update(&self, id: Uuid, update: UpdateCalendar) -> CalendarResult<Option<Calendar>>;

    /// Delete by id, returning whether a document was removed
    async fn delete(&self, id: Uuid) -> CalendarResult<bool>;

    /// Direct children of `parent_id`
    async fn children_of(&self, parent_id: Uuid) -> CalendarResult<Vec<Calendar>>;
}
