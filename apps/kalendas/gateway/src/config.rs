use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use gateway::GatewayConfig;

pub use core_config::Environment;

/// Gateway process configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub gateway: GatewayConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            gateway: GatewayConfig::from_env()?,
        })
    }
}
