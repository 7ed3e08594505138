//! Addresses of sibling services.
//!
//! Every Kalendas service that calls another one reads the peer's base URL from
//! `{NAME}_SERVICE_URL` and a per-peer request timeout from
//! `{NAME}_SERVICE_TIMEOUT_SECS`.

use crate::{env_or_default, env_parse, ConfigError};
use std::time::Duration;

/// Base URL and timeout for one upstream service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub name: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Load `{NAME}_SERVICE_URL` / `{NAME}_SERVICE_TIMEOUT_SECS` for the given service.
    pub fn from_env(
        name: &str,
        default_url: &str,
        default_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let prefix = name.to_ascii_uppercase();
        let base_url = env_or_default(&format!("{prefix}_SERVICE_URL"), default_url);
        let timeout_secs = env_parse(
            &format!("{prefix}_SERVICE_TIMEOUT_SECS"),
            default_timeout_secs,
        )?;

        Ok(Self::new(name, base_url, Duration::from_secs(timeout_secs)))
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
