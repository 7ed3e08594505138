//! Events Domain
//!
//! Events stored in the `eventos` collection, plus the calendar-hierarchy
//! listing that asks the calendar service for subcalendars.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /events routes (JSON + multipart create)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌───────────────────┐
//! │   Service   │ ───► │ CalendarDirectory │ ← calendar service (HTTP)
//! └──────┬──────┘      ├───────────────────┤
//!        │        ───► │     ImageHost     │ ← asset host (optional)
//! ┌──────▼──────┐      └───────────────────┘
//! │ Repository  │  ← trait + MongoDB implementation
//! └─────────────┘
//! ```
//!
//! The hierarchy expands one level: a calendar's events plus those of its direct
//! children. If the calendar service cannot be reached the listing fails rather
//! than returning a partial result.

pub mod calendar_directory;
pub mod error;
pub mod handlers;
pub mod image_host;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use calendar_directory::{CalendarDirectory, HttpCalendarDirectory};
pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use image_host::{HttpImageHost, ImageHost, ImageUpload};
pub use models::{Attachments, CreateEvent, Event, EventFilter, MapPoint, UpdateEvent};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;
