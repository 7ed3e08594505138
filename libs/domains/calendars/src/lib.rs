//! Calendars Domain
//!
//! Calendars and their parent/child hierarchy, stored in the `calendarios`
//! collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /calendars routes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Calendar, DTOs, filter
//! └─────────────┘
//! ```
//!
//! Deleting a calendar does not touch its subcalendars or its events.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_calendars::{handlers, CalendarService, MongoCalendarRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoCalendarRepository::new(client.database("KalendasDB"));
//! let router = handlers::router(CalendarService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CalendarError, CalendarResult};
pub use handlers::ApiDoc;
pub use models::{Calendar, CalendarFilter, CreateCalendar, UpdateCalendar};
pub use mongodb::MongoCalendarRepository;
pub use repository::CalendarRepository;
pub use service::CalendarService;
