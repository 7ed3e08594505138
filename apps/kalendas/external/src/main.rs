use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_ical_import::{HttpFeedSource, HttpKalendasClient, ImportService, handlers};
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

    let feed = HttpFeedSource::new(config.import.fetch_timeout)?;
    let client = HttpKalendasClient::new(
        config.import.calendar_service.clone(),
        config.import.event_service.clone(),
    )?;
    info!(
        calendar = %config.import.calendar_service.base_url,
        event = %config.import.event_service.base_url,
        "Import targets configured"
    );

    let router = create_router::<openapi::ApiDoc>(handlers::router(ImportService::new(feed, client)))?;
    let app = router.merge(health_router(config.app.clone()));

    info!("Starting external import service");
    create_production_app(app, &config.server, Duration::from_secs(30), async {})
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("External import service shutdown complete");
    Ok(())
}
