//! iCalendar Import Domain
//!
//! Downloads an external `.ics` feed and recreates it inside Kalendas through
//! the calendar and event services.
//!
//! # Flow
//!
//! ```text
//! POST /import/ical
//!        │
//! ┌──────▼──────┐      ┌──────────────┐
//! │   Service   │ ───► │  FeedSource  │ ← external URL (HTTP, redirects)
//! └──────┬──────┘      └──────────────┘
//!        │ parse_feed
//! ┌──────▼──────────┐
//! │ KalendasClient  │ ← POST calendars/, then POST events/ per VEVENT
//! └─────────────────┘
//! ```
//!
//! The import is not transactional. A calendar created before a failure stays.

pub mod client;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod ics;
pub mod models;
pub mod service;

pub use client::{HttpKalendasClient, KalendasClient};
pub use error::{ImportError, ImportResult};
pub use feed::{FeedSource, HttpFeedSource};
pub use handlers::ApiDoc;
pub use ics::parse_feed;
pub use models::{FeedEvent, ImportRequest, ImportSummary, NewCalendar, NewEvent};
pub use service::ImportService;
