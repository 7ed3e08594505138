//! Lookup of subcalendars in the calendar service

use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{EventError, EventResult};

/// Source of direct subcalendar ids for a calendar
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarDirectory: Send + Sync {
    /// Ids of the direct children of `calendar_id`. No children is an empty list.
    async fn subcalendar_ids(&self, calendar_id: Uuid) -> EventResult<Vec<Uuid>>;
}

#[derive(Deserialize)]
struct CalendarRef {
    #[serde(rename = "_id", alias = "id")]
    id: Uuid,
}

/// Calls `GET /calendars/{id}/subcalendars` on the calendar service
#[derive(Clone)]
pub struct HttpCalendarDirectory {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpCalendarDirectory {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl CalendarDirectory for HttpCalendarDirectory {
    #[instrument(skip(self))]
    async fn subcalendar_ids(&self, calendar_id: Uuid) -> EventResult<Vec<Uuid>> {
        let url = self
            .config
            .url(&format!("calendars/{}/subcalendars", calendar_id));

        let response = self.client.get(&url).send().await.map_err(|e| {
            EventError::UpstreamUnavailable(format!(
                "Could not connect to the calendar service: {}",
                e
            ))
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => {
                let children: Vec<CalendarRef> = response.json().await.map_err(|e| {
                    EventError::UpstreamUnavailable(format!(
                        "Invalid subcalendar list from the calendar service: {}",
                        e
                    ))
                })?;
                Ok(children.into_iter().map(|c| c.id).collect())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "Subcalendar lookup failed");
                Err(EventError::UpstreamUnavailable(format!(
                    "Calendar service answered {}",
                    status
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};
    use serde_json::json;
    use std::time::Duration;
    use test_utils::{spawn_upstream, unreachable_base_url};

    fn directory(base_url: String) -> HttpCalendarDirectory {
        HttpCalendarDirectory::new(UpstreamConfig::new(
            "calendar",
            base_url,
            Duration::from_secs(5),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_parses_children() {
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        let upstream = spawn_upstream(Router::new().route(
            "/calendars/{id}/subcalendars",
            get(move || async move {
                Json(json!([{"_id": child, "titulo": "Hijo", "organizador": "Org"}]))
            }),
        ))
        .await;

        let ids = directory(upstream.base_url())
            .subcalendar_ids(parent)
            .await
            .unwrap();
        assert_eq!(ids, vec![child]);
    }

    #[tokio::test]
    async fn test_not_found_means_no_children() {
        let upstream = spawn_upstream(Router::new().route(
            "/calendars/{id}/subcalendars",
            get(|| async { AxumStatus::NOT_FOUND }),
        ))
        .await;

        let ids = directory(upstream.base_url())
            .subcalendar_ids(Uuid::new_v4())
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let upstream = spawn_upstream(Router::new().route(
            "/calendars/{id}/subcalendars",
            get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let result = directory(upstream.base_url())
            .subcalendar_ids(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EventError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        let result = directory(unreachable_base_url().await)
            .subcalendar_ids(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(EventError::UpstreamUnavailable(_))));
    }
}
