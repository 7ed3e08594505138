use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_optional, env_parse, server::ServerConfig,
    upstream::UpstreamConfig,
};
use database::mongodb::MongoConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Unsigned-upload endpoint for event images
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHostConfig {
    pub upload_url: String,
    pub upload_preset: String,
    pub timeout: Duration,
}

impl ImageHostConfig {
    /// `None` unless both `IMAGE_HOST_UPLOAD_URL` and `IMAGE_HOST_UPLOAD_PRESET` are set
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(upload_url), Some(upload_preset)) = (
            env_optional("IMAGE_HOST_UPLOAD_URL"),
            env_optional("IMAGE_HOST_UPLOAD_PRESET"),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            upload_url,
            upload_preset,
            timeout: Duration::from_secs(env_parse("IMAGE_HOST_TIMEOUT_SECS", 30u64)?),
        }))
    }
}

/// Event service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub calendar_service: UpstreamConfig,
    pub image_host: Option<ImageHostConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            calendar_service: UpstreamConfig::from_env("calendar", "http://calendar_service:8000", 10)?,
            image_host: ImageHostConfig::from_env()?,
        })
    }
}
