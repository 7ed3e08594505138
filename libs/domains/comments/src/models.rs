use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Comment on a calendar or an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "idCalendario", default)]
    pub calendar_id: Option<Uuid>,
    #[serde(rename = "idEvento", default)]
    pub event_id: Option<Uuid>,
    /// Assigned by the server on creation
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a comment. At least one of the targets must be set.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "validate_target"))]
pub struct CreateComment {
    #[serde(rename = "contenido")]
    #[validate(length(min = 1, max = 1000, message = "contenido must have 1 to 1000 characters"))]
    pub content: String,
    #[serde(rename = "idCalendario", default)]
    pub calendar_id: Option<Uuid>,
    #[serde(rename = "idEvento", default)]
    pub event_id: Option<Uuid>,
}

fn validate_target(input: &CreateComment) -> Result<(), ValidationError> {
    if input.calendar_id.is_none() && input.event_id.is_none() {
        let mut error = ValidationError::new("missing_target");
        error.message = Some("A comment needs idCalendario or idEvento".into());
        return Err(error);
    }
    Ok(())
}

/// DTO for a partial update. Never touches `fechaCreacion`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateComment {
    #[serde(rename = "contenido")]
    #[validate(length(min = 1, max = 1000, message = "contenido must have 1 to 1000 characters"))]
    pub content: Option<String>,
    #[serde(rename = "idCalendario")]
    pub calendar_id: Option<Uuid>,
    #[serde(rename = "idEvento")]
    pub event_id: Option<Uuid>,
}

impl UpdateComment {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.calendar_id.is_none() && self.event_id.is_none()
    }
}

/// Equality filters for listing comments
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentFilter {
    #[serde(rename = "idCalendario")]
    pub calendar_id: Option<Uuid>,
    #[serde(rename = "idEvento")]
    pub event_id: Option<Uuid>,
}

/// Query flags for comment creation
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateCommentParams {
    /// Notify the event organizer (default `true`)
    #[serde(default = "default_true")]
    pub enviar_email: bool,
}

impl Default for CreateCommentParams {
    fn default() -> Self {
        Self { enviar_email: true }
    }
}

fn default_true() -> bool {
    true
}

/// How an organizer wants to hear about new comments.
///
/// Unknown values read as `Email`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display,
    EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationPreference {
    #[default]
    Email,
    App,
}

impl NotificationPreference {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<String> for NotificationPreference {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Stored preference of one user, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PreferenceRecord {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[serde(default)]
    pub notification_pref: NotificationPreference,
}

/// In-app notification shown to an organizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_email: String,
    pub message: String,
    pub event_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    /// Recipient address
    pub email: String,
}

/// Characters of the comment quoted in notifications
pub const EXCERPT_CHARS: usize = 50;

/// First [`EXCERPT_CHARS`] characters of `content`, with `...` when cut.
pub fn excerpt(content: &str) -> String {
    if content.chars().count() > EXCERPT_CHARS {
        let head: String = content.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

impl Comment {
    /// Create a comment with a fresh id and the current time
    pub fn new(input: CreateComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: input.content,
            calendar_id: input.calendar_id,
            event_id: input.event_id,
            created_at: Utc::now(),
        }
    }

    pub fn apply_update(&mut self, update: UpdateComment) {
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(calendar_id) = update.calendar_id {
            self.calendar_id = Some(calendar_id);
        }
        if let Some(event_id) = update.event_id {
            self.event_id = Some(event_id);
        }
    }
}

impl Notification {
    /// In-app notice about `author` commenting on the event titled `event_title`
    pub fn for_comment(
        user_email: impl Into<String>,
        author: &str,
        event_title: &str,
        content: &str,
        event_id: Uuid,
    ) -> Self {
        let head: String = content.chars().take(EXCERPT_CHARS).collect();
        Self {
            id: Uuid::new_v4(),
            user_email: user_email.into(),
            message: format!("{} comentó en '{}': {}...", author, event_title, head),
            event_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}
