use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, UnprocessableEntityResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::client::KalendasClient;
use crate::error::ImportResult;
use crate::feed::FeedSource;
use crate::models::{ImportRequest, ImportSummary};
use crate::service::ImportService;

#[derive(OpenApi)]
#[openapi(
    paths(import_ical),
    components(
        schemas(ImportRequest, ImportSummary),
        responses(
            BadRequestValidationResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Import", description = "One-shot import of external iCalendar feeds")
    )
)]
pub struct ApiDoc;

type SharedService<F, C> = Arc<ImportService<F, C>>;

/// Import routes, mounted under `/import`
pub fn router<F, C>(service: ImportService<F, C>) -> Router
where
    F: FeedSource + 'static,
    C: KalendasClient + 'static,
{
    Router::new()
        .route("/import/ical", post(import_ical))
        .route("/import/ical/", post(import_ical))
        .with_state(Arc::new(service))
}

/// Import an external `.ics` feed
///
/// Creates a public calendar and one event per VEVENT. Events that cannot be
/// translated or are rejected by the event service are counted as failed.
#[utoipa::path(
    post,
    path = "/import/ical",
    tag = "Import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import finished", body = ImportSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn import_ical<F: FeedSource, C: KalendasClient>(
    State(service): State<SharedService<F, C>>,
    ValidatedJson(request): ValidatedJson<ImportRequest>,
) -> ImportResult<Json<ImportSummary>> {
    let summary = service.import(request).await?;
    Ok(Json(summary))
}
