//! Comment Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CommentError, CommentResult};
use crate::event_lookup::EventLookup;
use crate::models::{
    Comment, CommentFilter, CreateComment, Notification, PreferenceRecord, UpdateComment,
};
use crate::notifier::{NotificationOutcome, Notifier};
use crate::providers::EmailProvider;
use crate::repository::{CommentRepository, NotificationRepository, PreferenceRepository};

/// Most recent notifications returned per recipient
pub const NOTIFICATION_PAGE_SIZE: i64 = 50;

/// Comment service
///
/// Storing a comment and notifying about it are two separate steps: the first
/// decides the result of `create_comment`, the second is only logged.
pub struct CommentService<R, P, N>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    comments: Arc<R>,
    preferences: Arc<P>,
    notifications: Arc<N>,
    notifier: Notifier<P, N>,
}

impl<R, P, N> CommentService<R, P, N>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    pub fn new(comments: R, preferences: P, notifications: N, events: impl EventLookup + 'static) -> Self {
        let preferences = Arc::new(preferences);
        let notifications = Arc::new(notifications);
        let notifier = Notifier::new(
            Arc::new(events),
            Arc::clone(&preferences),
            Arc::clone(&notifications),
        );

        Self {
            comments: Arc::new(comments),
            preferences,
            notifications,
            notifier,
        }
    }

    /// Deliver `email` preference notifications through `provider`
    pub fn with_email_provider(mut self, provider: impl EmailProvider + 'static) -> Self {
        self.notifier = self.notifier.with_email_provider(Arc::new(provider));
        self
    }

    /// Store a comment, then notify the event organizer unless `notify` is false.
    ///
    /// The outcome of the notification never changes the result.
    #[instrument(skip(self, input, author))]
    pub async fn create_comment(
        &self,
        input: CreateComment,
        author: &str,
        notify: bool,
    ) -> CommentResult<Comment> {
        input
            .validate()
            .map_err(|e| CommentError::Validation(e.to_string()))?;

        let comment = self.comments.insert(Comment::new(input)).await?;

        if !notify {
            tracing::info!(comment_id = %comment.id, "Notification skipped by caller");
            return Ok(comment);
        }

        match self.notifier.notify(&comment, author).await {
            NotificationOutcome::Emailed => {
                tracing::info!(comment_id = %comment.id, "Organizer notified by email")
            }
            NotificationOutcome::StoredInApp => {
                tracing::info!(comment_id = %comment.id, "Organizer notified in app")
            }
            NotificationOutcome::Skipped(reason) => {
                tracing::info!(comment_id = %comment.id, %reason, "Notification skipped")
            }
            NotificationOutcome::Failed(reason) => {
                tracing::warn!(comment_id = %comment.id, %reason, "Notification failed")
            }
        }

        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn get_comment(&self, id: Uuid) -> CommentResult<Comment> {
        self.comments
            .get_by_id(id)
            .await?
            .ok_or(CommentError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_comments(&self, filter: CommentFilter) -> CommentResult<Vec<Comment>> {
        self.comments.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_comment(&self, id: Uuid, input: UpdateComment) -> CommentResult<Comment> {
        input
            .validate()
            .map_err(|e| CommentError::Validation(e.to_string()))?;

        self.comments
            .update(id, input)
            .await?
            .ok_or(CommentError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: Uuid) -> CommentResult<()> {
        if !self.comments.delete(id).await? {
            return Err(CommentError::NotFound(id));
        }
        Ok(())
    }

    /// Newest in-app notifications for `email`
    #[instrument(skip(self))]
    pub async fn notifications_for(&self, email: &str) -> CommentResult<Vec<Notification>> {
        self.notifications
            .list_for(email, NOTIFICATION_PAGE_SIZE)
            .await
    }

    /// Stored preference, `email` when the address was never seen
    #[instrument(skip(self))]
    pub async fn preference_for(&self, email: &str) -> CommentResult<PreferenceRecord> {
        let preference = self.preferences.get(email).await?.unwrap_or_default();
        Ok(PreferenceRecord {
            email: email.to_string(),
            notification_pref: preference,
        })
    }

    #[instrument(skip(self, input), fields(preference = input.notification_pref.as_str()))]
    pub async fn set_preference(&self, input: PreferenceRecord) -> CommentResult<PreferenceRecord> {
        input
            .validate()
            .map_err(|e| CommentError::Validation(e.to_string()))?;

        self.preferences
            .upsert(&input.email, input.notification_pref)
            .await?;
        Ok(input)
    }
}

impl<R, P, N> Clone for CommentService<R, P, N>
where
    R: CommentRepository,
    P: PreferenceRepository,
    N: NotificationRepository,
{
    fn clone(&self) -> Self {
        Self {
            comments: Arc::clone(&self.comments),
            preferences: Arc::clone(&self.preferences),
            notifications: Arc::clone(&self.notifications),
            notifier: self.notifier.clone(),
        }
    }
}
