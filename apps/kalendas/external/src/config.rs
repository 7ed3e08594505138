use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig,
    upstream::UpstreamConfig,
};
use std::time::Duration;

pub use core_config::Environment;

/// Where imported calendars and events are written, and how long to wait
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    pub fetch_timeout: Duration,
    pub calendar_service: UpstreamConfig,
    pub event_service: UpstreamConfig,
}

impl FromEnv for ImportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let fetch_timeout = Duration::from_secs(env_parse("IMPORT_FETCH_TIMEOUT_SECS", 60u64)?);
        let upstream_timeout =
            Duration::from_secs(env_parse("IMPORT_UPSTREAM_TIMEOUT_SECS", 60u64)?);

        Ok(Self {
            fetch_timeout,
            calendar_service: UpstreamConfig::new(
                "calendar",
                env_or_default("CALENDAR_SERVICE_URL", "http://calendar_service:8000"),
                upstream_timeout,
            ),
            event_service: UpstreamConfig::new(
                "event",
                env_or_default("EVENT_SERVICE_URL", "http://event_service:8000"),
                upstream_timeout,
            ),
        })
    }
}

/// External-import service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub import: ImportConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            import: ImportConfig::from_env()?,
        })
    }
}
