//! Resolution of the event a comment belongs to

use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use serde::Deserialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{CommentError, CommentResult};

const DEFAULT_EVENT_TITLE: &str = "Evento";

/// What the notifier needs to know about an event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSummary {
    #[serde(rename = "titulo", default = "default_title")]
    pub title: String,
    #[serde(rename = "emailOrganizador", default)]
    pub organizer_email: Option<String>,
}

fn default_title() -> String {
    DEFAULT_EVENT_TITLE.to_string()
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLookup: Send + Sync {
    /// `Ok(None)` when the event service does not return the event
    async fn find_event(&self, event_id: Uuid) -> CommentResult<Option<EventSummary>>;
}

/// Calls `GET /events/{id}` on the event service
#[derive(Clone)]
pub struct HttpEventLookup {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpEventLookup {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EventLookup for HttpEventLookup {
    #[instrument(skip(self))]
    async fn find_event(&self, event_id: Uuid) -> CommentResult<Option<EventSummary>> {
        let url = self.config.url(&format!("events/{}", event_id));

        let response = self.client.get(&url).send().await.map_err(|e| {
            CommentError::UpstreamUnavailable(format!(
                "Could not connect to the event service: {}",
                e
            ))
        })?;

        if response.status() != reqwest::StatusCode::OK {
            warn!(status = %response.status(), event_id = %event_id, "Event lookup failed");
            return Ok(None);
        }

        let summary = response.json::<EventSummary>().await.map_err(|e| {
            CommentError::UpstreamUnavailable(format!("Invalid event from the event service: {}", e))
        })?;
        Ok(Some(summary))
    }
}
