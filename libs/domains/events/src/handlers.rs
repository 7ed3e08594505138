use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::calendar_directory::CalendarDirectory;
use crate::error::{EventError, EventResult};
use crate::image_host::ImageUpload;
use crate::models::{Attachments, CreateEvent, Event, EventFilter, MapPoint, UpdateEvent};
use crate::repository::EventRepository;
use crate::service::EventService;

/// Upper bound for multipart creates with images
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        get_event,
        update_event,
        delete_event,
        list_calendar_events,
    ),
    components(
        schemas(Event, CreateEvent, UpdateEvent, EventFilter, Attachments, MapPoint),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Events and calendar-hierarchy listings")
    )
)]
pub struct ApiDoc;

type SharedService<R, D> = Arc<EventService<R, D>>;

/// Event routes, mounted under `/events`
pub fn router<R, D>(service: EventService<R, D>) -> Router
where
    R: EventRepository + 'static,
    D: CalendarDirectory + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/calendar/{id}", get(list_calendar_events))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "/events/",
    tag = "Events",
    params(EventFilter),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events(filter).await?;
    Ok(Json(events))
}

/// Create an event
///
/// Accepts a JSON body, or `multipart/form-data` with the JSON payload in an
/// `event` field and any number of `imagen`/`image` files. Uploaded image URLs
/// are appended to `contenidoAdjunto.imagenes`.
#[utoipa::path(
    post,
    path = "/events/",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    request: Request,
) -> EventResult<Response> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let event = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| EventError::Validation(e.body_text()))?;
        let (input, images) = read_multipart(multipart).await?;
        service.create_event_with_images(input, images).await?
    } else {
        match ValidatedJson::<CreateEvent>::from_request(request, &()).await {
            Ok(ValidatedJson(input)) => service.create_event(input).await?,
            Err(rejection) => return Ok(rejection),
        }
    };

    Ok((StatusCode::CREATED, Json(event)).into_response())
}

async fn read_multipart(mut multipart: Multipart) -> EventResult<(CreateEvent, Vec<ImageUpload>)> {
    let mut input = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EventError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("event") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| EventError::Validation(e.body_text()))?;
                let parsed = serde_json::from_str::<CreateEvent>(&text)
                    .map_err(|e| EventError::Validation(format!("Invalid event payload: {}", e)))?;
                input = Some(parsed);
            }
            Some("imagen") | Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| EventError::Validation(e.body_text()))?;

                // Browsers send an empty part when no file was picked
                if !bytes.is_empty() {
                    images.push(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let input = input.ok_or_else(|| {
        EventError::Validation("Multipart body must include an 'event' field".to_string())
    })?;
    Ok((input, images))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Event>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Partially update an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(id, input).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
) -> EventResult<impl IntoResponse> {
    service.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Events of a calendar and of its direct subcalendars
#[utoipa::path(
    get,
    path = "/events/calendar/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Calendar ID")
    ),
    responses(
        (status = 200, description = "Events of the calendar and its subcalendars (may be empty)", body = Vec<Event>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_calendar_events<R: EventRepository, D: CalendarDirectory>(
    State(service): State<SharedService<R, D>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.events_for_calendar(id).await?;
    Ok(Json(events))
}
