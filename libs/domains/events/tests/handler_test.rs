//! Handler tests for the event routes with in-memory collaborators.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use domain_events::{
    CalendarDirectory, Event, EventError, EventFilter, EventRepository, EventResult, EventService,
    ImageHost, ImageUpload, UpdateEvent, handlers,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default, Clone)]
struct InMemoryEvents {
    events: Arc<Mutex<Vec<Event>>>,
}

#[async_trait]
impl EventRepository for InMemoryEvents {
    async fn insert(&self, event: Event) -> EventResult<Event> {
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        Ok(self.events.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let contains = |field: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_none_or(|n| field.to_lowercase().contains(&n.to_lowercase()))
        };
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.fecha_inicio.is_none_or(|from| e.starts_at >= from))
            .filter(|e| filter.fecha_fin.is_none_or(|to| e.starts_at <= to))
            .filter(|e| filter.duration_minima.is_none_or(|min| e.duration_minutes >= min))
            .filter(|e| filter.duration_maxima.is_none_or(|max| e.duration_minutes <= max))
            .filter(|e| contains(&e.location, &filter.lugar))
            .filter(|e| contains(&e.organizer, &filter.organizador))
            .filter(|e| contains(&e.title, &filter.titulo))
            .cloned()
            .collect())
    }

    async fn list_by_calendars(&self, calendar_ids: Vec<Uuid>) -> EventResult<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| calendar_ids.contains(&e.calendar_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, update: UpdateEvent) -> EventResult<Option<Event>> {
        let mut events = self.events.lock().unwrap();
        Ok(events.iter_mut().find(|e| e.id == id).map(|event| {
            event.apply_update(update);
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }
}

/// Parent id -> child ids; `None` simulates an unreachable calendar service
struct StaticDirectory(Option<HashMap<Uuid, Vec<Uuid>>>);

#[async_trait]
impl CalendarDirectory for StaticDirectory {
    async fn subcalendar_ids(&self, calendar_id: Uuid) -> EventResult<Vec<Uuid>> {
        match &self.0 {
            Some(tree) => Ok(tree.get(&calendar_id).cloned().unwrap_or_default()),
            None => Err(EventError::UpstreamUnavailable(
                "Could not connect to the calendar service".into(),
            )),
        }
    }
}

struct FakeImageHost;

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, image: ImageUpload) -> EventResult<String> {
        Ok(format!("https://cdn.test/{}", image.file_name))
    }
}

fn app_with(tree: Option<HashMap<Uuid, Vec<Uuid>>>) -> Router {
    let service = EventService::new(InMemoryEvents::default(), StaticDirectory(tree))
        .with_image_host(FakeImageHost);
    handlers::router(service)
}

fn app() -> Router {
    app_with(Some(HashMap::new()))
}

fn event_payload(calendar_id: Uuid, title: &str) -> Value {
    json!({
        "idCalendario": calendar_id,
        "titulo": title,
        "horaComienzo": "2025-08-15T21:30:00",
        "duracionMinutos": 90,
        "lugar": "Parque de la Ciudad",
        "organizador": "Concejalia de Cultura",
        "emailOrganizador": "cultura@example.com"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, created) = send(app, "POST", "/events/", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

fn ids(value: &Value) -> Vec<String> {
    let mut ids: Vec<String> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["_id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_create_and_get() {
    let app = app();
    let created = create(&app, event_payload(Uuid::new_v4(), "Concierto de Verano")).await;
    assert_eq!(created["horaComienzo"], "2025-08-15T21:30:00");
    assert_eq!(created["contenidoAdjunto"]["imagenes"], json!([]));

    let uri = format!("/events/{}", created["_id"].as_str().unwrap());
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_start_times_accept_minutes_and_offsets() {
    let app = app();
    let mut payload = event_payload(Uuid::new_v4(), "Concierto de Verano");
    payload["horaComienzo"] = json!("2025-08-15T21:30");
    let created = create(&app, payload).await;
    assert_eq!(created["horaComienzo"], "2025-08-15T21:30:00");

    let (status, listed) = send(
        &app,
        "GET",
        "/events/?fecha_inicio=2025-08-15T21:30&fecha_fin=2025-08-15T23:30:00%2B02:00",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&listed), ids(&json!([created])));

    let mut bad = event_payload(Uuid::new_v4(), "Concierto");
    bad["horaComienzo"] = json!("15/08/2025 21:30");
    let (status, _) = send(&app, "POST", "/events/", Some(bad)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_create_rejects_zero_duration() {
    let mut payload = event_payload(Uuid::new_v4(), "Concierto");
    payload["duracionMinutos"] = json!(0);

    let (status, body) = send(&app(), "POST", "/events/", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_calendar_listing_includes_direct_subcalendars_only() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    let app = app_with(Some(HashMap::from([(a, vec![b])])));

    let e1 = create(&app, event_payload(a, "Evento A")).await;
    let e2 = create(&app, event_payload(b, "Evento B")).await;
    create(&app, event_payload(c, "Evento C")).await;

    let (status, listed) = send(&app, "GET", &format!("/events/calendar/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&listed), ids(&json!([e1, e2])));
}

#[tokio::test]
async fn test_calendar_listing_empty_is_ok() {
    let (status, listed) = send(
        &app(),
        "GET",
        &format!("/events/calendar/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_calendar_listing_fails_when_directory_unreachable() {
    let (status, body) = send(
        &app_with(None),
        "GET",
        &format!("/events/calendar/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_list_filters_are_anded() {
    let app = app();
    let calendar = Uuid::new_v4();

    let mut short = event_payload(calendar, "Charla corta");
    short["duracionMinutos"] = json!(30);
    create(&app, short).await;

    let mut long = event_payload(calendar, "Charla larga");
    long["duracionMinutos"] = json!(180);
    long["lugar"] = json!("Teatro Cervantes");
    create(&app, long).await;

    let (status, listed) = send(
        &app,
        "GET",
        "/events/?titulo=CHARLA&duration_minima=60&duration_maxima=200&lugar=teatro",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["titulo"], "Charla larga");

    let (_, in_range) = send(
        &app,
        "GET",
        "/events/?fecha_inicio=2025-08-15T21:30:00&fecha_fin=2025-08-15T21:30:00",
        None,
    )
    .await;
    assert_eq!(in_range.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_multipart_create_uploads_images() {
    let boundary = "kalendas-boundary";
    let event = event_payload(Uuid::new_v4(), "Concierto con cartel");
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"event\"\r\n\r\n\
         {event}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"imagen\"; filename=\"cartel.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         JPEGDATA\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"vacio.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         \r\n\
         --{b}--\r\n",
        b = boundary,
        event = event,
    );

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events/")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        created["contenidoAdjunto"]["imagenes"],
        json!(["https://cdn.test/cartel.jpg"])
    );
}

#[tokio::test]
async fn test_multipart_without_event_field_is_bad_request() {
    let boundary = "kalendas-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = app();
    let created = create(&app, event_payload(Uuid::new_v4(), "Original")).await;
    let uri = format!("/events/{}", created["_id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({"duracionMinutos": 45}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["duracionMinutos"], 45);
    assert_eq!(updated["titulo"], "Original");

    let (first, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(first, StatusCode::NO_CONTENT);
    let (second, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(second, StatusCode::NOT_FOUND);
}
