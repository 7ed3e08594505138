//! Calls into the calendar and event services

use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ImportError, ImportResult};
use crate::models::{NewCalendar, NewEvent};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KalendasClient: Send + Sync {
    /// Create the container calendar and return its id
    async fn create_calendar(&self, calendar: &NewCalendar) -> ImportResult<Uuid>;

    /// Create one event. Only `201 Created` counts as success.
    async fn create_event(&self, event: &NewEvent) -> ImportResult<()>;
}

#[derive(Deserialize)]
struct CreatedCalendar {
    #[serde(rename = "_id", alias = "id")]
    id: Uuid,
}

/// HTTP client for the calendar and event services
#[derive(Clone)]
pub struct HttpKalendasClient {
    client: reqwest::Client,
    calendars: UpstreamConfig,
    events: UpstreamConfig,
}

impl HttpKalendasClient {
    pub fn new(calendars: UpstreamConfig, events: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            calendars,
            events,
        })
    }
}

#[async_trait]
impl KalendasClient for HttpKalendasClient {
    #[instrument(skip(self, calendar), fields(title = %calendar.titulo))]
    async fn create_calendar(&self, calendar: &NewCalendar) -> ImportResult<Uuid> {
        let response = self
            .client
            .post(self.calendars.url("calendars/"))
            .timeout(self.calendars.timeout)
            .json(calendar)
            .send()
            .await
            .map_err(|e| ImportError::CalendarCreation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Calendar service rejected the container calendar");
            return Err(ImportError::CalendarCreation(body));
        }

        let created: CreatedCalendar = response
            .json()
            .await
            .map_err(|e| ImportError::CalendarCreation(e.to_string()))?;
        Ok(created.id)
    }

    #[instrument(skip(self, event), fields(title = %event.titulo))]
    async fn create_event(&self, event: &NewEvent) -> ImportResult<()> {
        let response = self
            .client
            .post(self.events.url("events/"))
            .timeout(self.events.timeout)
            .json(event)
            .send()
            .await
            .map_err(|e| ImportError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ImportError::EventRejected { status, body })
            }
        }
    }
}
