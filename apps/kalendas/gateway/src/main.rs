use axum_helpers::server::{create_production_app, docs_router, health_router, trace_layer};
use core_config::tracing::{init_tracing, install_color_eyre};
use gateway::GatewayState;
use std::time::Duration;
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    for entry in config.gateway.registry.entries() {
        info!(service = %entry.name, url = %entry.base_url, "Upstream registered");
    }

    let state = GatewayState::from_config(&config.gateway)?;

    // No compression layer: upstream bodies are relayed byte for byte
    let app = gateway::router(state)
        .merge(docs_router::<openapi::ApiDoc>())
        .merge(health_router(config.app.clone()))
        .layer(trace_layer());

    info!(
        timeout = ?config.gateway.upstream_timeout,
        internal_header = %config.gateway.internal_header,
        "Starting API gateway"
    );
    create_production_app(app, &config.server, Duration::from_secs(30), async {})
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("API gateway shutdown complete");
    Ok(())
}
