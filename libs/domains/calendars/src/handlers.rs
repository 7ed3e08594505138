use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::Query;
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CalendarResult;
use crate::models::{Calendar, CalendarFilter, CreateCalendar, UpdateCalendar};
use crate::repository::CalendarRepository;
use crate::service::CalendarService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_calendars,
        create_calendar,
        get_calendar,
        update_calendar,
        delete_calendar,
        list_subcalendars,
    ),
    components(
        schemas(Calendar, CreateCalendar, UpdateCalendar, CalendarFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Calendars", description = "Calendars and their subcalendar hierarchy")
    )
)]
pub struct ApiDoc;

/// Calendar routes, mounted under `/calendars`
pub fn router<R: CalendarRepository + 'static>(service: CalendarService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/calendars", get(list_calendars).post(create_calendar))
        .route("/calendars/", get(list_calendars).post(create_calendar))
        .route(
            "/calendars/{id}",
            get(get_calendar).put(update_calendar).delete(delete_calendar),
        )
        .route("/calendars/{id}/subcalendars", get(list_subcalendars))
        .with_state(shared_service)
}

/// List calendars with optional filters
#[utoipa::path(
    get,
    path = "/calendars/",
    tag = "Calendars",
    params(CalendarFilter),
    responses(
        (status = 200, description = "Matching calendars", body = Vec<Calendar>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_calendars<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    Query(filter): Query<CalendarFilter>,
) -> CalendarResult<Json<Vec<Calendar>>> {
    let calendars = service.list_calendars(filter).await?;
    Ok(Json(calendars))
}

/// Create a calendar
#[utoipa::path(
    post,
    path = "/calendars/",
    tag = "Calendars",
    request_body = CreateCalendar,
    responses(
        (status = 201, description = "Calendar created", body = Calendar),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_calendar<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCalendar>,
) -> CalendarResult<impl IntoResponse> {
    let calendar = service.create_calendar(input).await?;
    Ok((StatusCode::CREATED, Json(calendar)))
}

#[utoipa::path(
    get,
    path = "/calendars/{id}",
    tag = "Calendars",
    params(
        ("id" = Uuid, Path, description = "Calendar ID")
    ),
    responses(
        (status = 200, description = "Calendar found", body = Calendar),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_calendar<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    UuidPath(id): UuidPath,
) -> CalendarResult<Json<Calendar>> {
    let calendar = service.get_calendar(id).await?;
    Ok(Json(calendar))
}

/// Partially update a calendar
#[utoipa::path(
    put,
    path = "/calendars/{id}",
    tag = "Calendars",
    params(
        ("id" = Uuid, Path, description = "Calendar ID")
    ),
    request_body = UpdateCalendar,
    responses(
        (status = 200, description = "Calendar updated", body = Calendar),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_calendar<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCalendar>,
) -> CalendarResult<Json<Calendar>> {
    let calendar = service.update_calendar(id, input).await?;
    Ok(Json(calendar))
}

/// Delete a calendar (subcalendars and events are left in place)
#[utoipa::path(
    delete,
    path = "/calendars/{id}",
    tag = "Calendars",
    params(
        ("id" = Uuid, Path, description = "Calendar ID")
    ),
    responses(
        (status = 204, description = "Calendar deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_calendar<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    UuidPath(id): UuidPath,
) -> CalendarResult<impl IntoResponse> {
    service.delete_calendar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Direct subcalendars of a calendar
#[utoipa::path(
    get,
    path = "/calendars/{id}/subcalendars",
    tag = "Calendars",
    params(
        ("id" = Uuid, Path, description = "Parent calendar ID")
    ),
    responses(
        (status = 200, description = "Direct children", body = Vec<Calendar>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_subcalendars<R: CalendarRepository>(
    State(service): State<Arc<CalendarService<R>>>,
    UuidPath(id): UuidPath,
) -> CalendarResult<Json<Vec<Calendar>>> {
    let children = service.subcalendars(id).await?;
    Ok(Json(children))
}
