//! Download of external calendar feeds

use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ImportError, ImportResult};

/// Some feed hosts refuse requests that do not look like a browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Raw feed content
    async fn fetch(&self, url: &str) -> ImportResult<String>;
}

/// Fetches feeds over HTTP, following redirects
#[derive(Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> ImportResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::info!(error = %e, "Feed download failed");
                ImportError::Download(e.to_string())
            })?;

        response
            .text()
            .await
            .map_err(|e| ImportError::Download(e.to_string()))
    }
}
