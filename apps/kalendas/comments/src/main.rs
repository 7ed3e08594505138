use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::server::{
    HealthCheckFuture, create_production_app, create_router, health_router, run_health_checks,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_comments::{
    CommentService, HttpEventLookup, MongoCommentRepository, MongoNotificationRepository,
    MongoPreferenceRepository, SendGridProvider, handlers,
};
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

    // Tracing first: loading the config may warn about a missing email provider
    let environment = core_config::Environment::from_env();
    init_tracing(&environment);

    let config = Config::from_env()?;

    let mongo_client = database::mongodb::connect_from_config_with_retry(
        &config.mongodb,
        Some(RetryConfig::startup()),
    )
    .await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = %config.mongodb.database(), "MongoDB ready");

    let events = HttpEventLookup::new(config.event_service.clone())?;
    let mut service = CommentService::new(
        MongoCommentRepository::new(db.clone()),
        MongoPreferenceRepository::new(db.clone()),
        MongoNotificationRepository::new(db),
        events,
    );

    if let Some(sendgrid) = config.sendgrid.clone() {
        info!(from = %sendgrid.from_email, "Email notifications via SendGrid");
        service = service.with_email_provider(SendGridProvider::new(sendgrid, config.email_timeout)?);
    }

    let router = create_router::<openapi::ApiDoc>(handlers::router(service))?;
    let app = router
        .merge(health_router(config.app.clone()))
        .merge(readiness_router(mongo_client.clone()));

    info!("Starting comment service");
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        drop(mongo_client);
        info!("MongoDB client released");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Comment service shutdown complete");
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
