use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CommentResult;
use crate::models::{Comment, CommentFilter, Notification, NotificationPreference, UpdateComment};

/// Storage for comments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> CommentResult<Comment>;

    async fn get_by_id(&self, id: Uuid) -> CommentResult<Option<Comment>>;

    async fn list(&self, filter: CommentFilter) -> CommentResult<Vec<Comment>>;

    /// Returns the updated comment, or `None` if `id` does not exist
    async fn update(&self, id: Uuid, update: UpdateComment) -> CommentResult<Option<Comment>>;

    /// Returns `true` if a comment was deleted
    async fn delete(&self, id: Uuid) -> CommentResult<bool>;
}

/// Notification preferences keyed by email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn get(&self, email: &str) -> CommentResult<Option<NotificationPreference>>;

    async fn upsert(&self, email: &str, preference: NotificationPreference) -> CommentResult<()>;
}

/// In-app notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: Notification) -> CommentResult<()>;

    /// Newest first, at most `limit`
    async fn list_for(&self, email: &str, limit: i64) -> CommentResult<Vec<Notification>>;
}
