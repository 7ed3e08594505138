//! Comments Domain
//!
//! Comments on calendars and events, plus organizer notifications.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /comments routes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐  1. persist   ┌──────────────────────┐
//! │   Service   │ ────────────► │  CommentRepository   │
//! └──────┬──────┘               └──────────────────────┘
//!        │ 2. notify (best effort)
//! ┌──────▼──────┐      ┌─────────────┐
//! │  Notifier   │ ───► │ EventLookup │ ← event service (HTTP)
//! └──────┬──────┘      └─────────────┘
//!        ├──► PreferenceRepository   (users)
//!        ├──► EmailProvider          (SendGrid)
//!        └──► NotificationRepository (notificaciones)
//! ```
//!
//! Only comments attached to an event notify anyone. The organizer's stored
//! preference picks between an email and an in-app notification; an unknown
//! organizer defaults to email.

pub mod error;
pub mod event_lookup;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod notifier;
pub mod providers;
pub mod repository;
pub mod service;

pub use error::{CommentError, CommentResult};
pub use event_lookup::{EventLookup, EventSummary, HttpEventLookup};
pub use handlers::ApiDoc;
pub use models::{
    Comment, CommentFilter, CreateComment, Notification, NotificationPreference,
    PreferenceRecord, UpdateComment,
};
pub use mongodb::{MongoCommentRepository, MongoNotificationRepository, MongoPreferenceRepository};
pub use notifier::{NotificationOutcome, Notifier};
pub use providers::{EmailContent, EmailProvider, SendGridConfig, SendGridProvider};
pub use repository::{CommentRepository, NotificationRepository, PreferenceRepository};
pub use service::CommentService;
