use core_config::{
    AppInfo, FromEnv, app_info, env_parse, server::ServerConfig, upstream::UpstreamConfig,
};
use database::mongodb::MongoConfig;
use domain_comments::SendGridConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Comment service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub event_service: UpstreamConfig,
    /// Without it, `email` preference notifications are logged and dropped
    pub sendgrid: Option<SendGridConfig>,
    pub email_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let sendgrid = match SendGridConfig::from_env() {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, "SendGrid not configured, email notifications disabled");
                None
            }
        };

        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            event_service: UpstreamConfig::from_env("event", "http://event_service:8000", 10)?,
            sendgrid,
            email_timeout: Duration::from_secs(env_parse("EMAIL_TIMEOUT_SECS", 10u64)?),
        })
    }
}
