use axum::http::HeaderName;
use axum_helpers::{JwtAuth, JwtConfig};
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use std::time::Duration;

use crate::provenance::{AuthPolicy, DEFAULT_INTERNAL_HEADER};
use crate::registry::ServiceRegistry;

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Everything the gateway needs besides its listen address
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub registry: ServiceRegistry,
    pub internal_header: HeaderName,
    /// When set, the internal marker must carry exactly this value
    pub internal_token: Option<String>,
    pub jwt: JwtConfig,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    pub fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy::new(
            self.internal_header.clone(),
            self.internal_token.clone(),
            JwtAuth::new(&self.jwt),
        )
    }
}

impl FromEnv for GatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let header = env_or_default("GATEWAY_INTERNAL_HEADER", DEFAULT_INTERNAL_HEADER);
        let internal_header =
            HeaderName::try_from(header.to_ascii_lowercase()).map_err(|e| ConfigError::ParseError {
                key: "GATEWAY_INTERNAL_HEADER".to_string(),
                details: e.to_string(),
            })?;

        let timeout_secs = env_parse("GATEWAY_UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;

        Ok(Self {
            registry: ServiceRegistry::from_env()?,
            internal_header,
            internal_token: env_optional("GATEWAY_INTERNAL_TOKEN"),
            jwt: JwtConfig::from_env()?,
            upstream_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes: env_parse("GATEWAY_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}
