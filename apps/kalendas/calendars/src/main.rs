use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::server::{
    HealthCheckFuture, create_production_app, create_router, health_router, run_health_checks,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_calendars::{CalendarService, MongoCalendarRepository, handlers};
use database::common::RetryConfig;
use mongodb::Client;
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

    let mongo_client = database::mongodb::connect_from_config_with_retry(
        &config.mongodb,
        Some(RetryConfig::startup()),
    )
    .await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = %config.mongodb.database(), "MongoDB ready");

    let service = CalendarService::new(MongoCalendarRepository::new(db));
    let router = create_router::<openapi::ApiDoc>(handlers::router(service))?;

    let app = router
        .merge(health_router(config.app.clone()))
        .merge(readiness_router(mongo_client.clone()));

    info!("Starting calendar service");
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        drop(mongo_client);
        info!("MongoDB client released");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Calendar service shutdown complete");
    Ok(())
}

fn readiness_router(client: Client) -> Router {
    Router::new()
        .route("/ready", get(readiness))
        .with_state(client)
}

async fn readiness(State(client): State<Client>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async move {
            database::mongodb::check_health(&client)
                .await
                .map_err(|e| e.to_string())
        }),
    )];
    run_health_checks(checks).await
}
