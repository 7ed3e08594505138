//! Import Service - one-shot translation of a feed into a calendar and events

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::client::KalendasClient;
use crate::error::{ImportError, ImportResult};
use crate::feed::FeedSource;
use crate::ics::parse_feed;
use crate::models::{ImportRequest, ImportSummary, NewCalendar, NewEvent};

/// Import service
///
/// Creates the container calendar first, then the events one by one. A failed
/// event is counted and skipped; nothing is rolled back.
pub struct ImportService<F: FeedSource, C: KalendasClient> {
    feed: Arc<F>,
    client: Arc<C>,
}

impl<F: FeedSource, C: KalendasClient> ImportService<F, C> {
    pub fn new(feed: F, client: C) -> Self {
        Self {
            feed: Arc::new(feed),
            client: Arc::new(client),
        }
    }

    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn import(&self, request: ImportRequest) -> ImportResult<ImportSummary> {
        request
            .validate()
            .map_err(|e| ImportError::Validation(e.to_string()))?;

        let content = self.feed.fetch(&request.url).await?;
        let events = parse_feed(&content)?;

        let calendar = NewCalendar::imported(&request.titulo_importado, &request.organizador);
        let calendar_id = self.client.create_calendar(&calendar).await?;
        tracing::info!(calendar_id = %calendar_id, vevents = events.len(), "Container calendar created");

        let mut imported = 0u32;
        let mut failed = 0u32;

        for event in events {
            let event = match event {
                Ok(event) => event,
                Err(reason) => {
                    tracing::warn!(%reason, "Skipping VEVENT");
                    failed += 1;
                    continue;
                }
            };

            let title = event.title.clone();
            match self
                .client
                .create_event(&NewEvent::from_feed(event, calendar_id, &request))
                .await
            {
                Ok(()) => imported += 1,
                Err(e) => {
                    tracing::warn!(title = %title, error = %e, "Imported event was not created");
                    failed += 1;
                }
            }
        }

        tracing::info!(calendar_id = %calendar_id, imported, failed, "Import finished");
        Ok(ImportSummary::new(calendar_id, imported, failed))
    }
}

impl<F: FeedSource, C: KalendasClient> Clone for ImportService<F, C> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            client: Arc::clone(&self.client),
        }
    }
}
