//! End-to-end import tests against local stand-ins for the feed host and the
//! calendar and event services.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
};
use core_config::upstream::UpstreamConfig;
use domain_ical_import::{HttpFeedSource, HttpKalendasClient, ImportService, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_utils::{TestUpstream, spawn_upstream, unreachable_base_url};
use tower::ServiceExt;
use uuid::Uuid;

const HOLIDAYS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//OfficeHolidays//EN\r\n\
BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Año Nuevo\r\nDTSTART;VALUE=DATE:20250101\r\nDTEND;VALUE=DATE:20250102\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:2\r\nSUMMARY:Día de Reyes\r\nLOCATION:España\r\nDTSTART:20250106T090000Z\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:3\r\nSUMMARY:Roto\r\nDTSTART:sin-fecha\r\nEND:VEVENT\r\n\
END:VCALENDAR\r\n";

const BROKEN_LINE: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Año Nuevo\r\nDTSTART;VALUE=DATE:20250101\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:2\r\nSUMMARY:Carnaval\r\nESTA LINEA NO TIENE DOS PUNTOS\r\nDTSTART;VALUE=DATE:20250303\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:3\r\nSUMMARY:Día de Reyes\r\nDTSTART:20250106T090000Z\r\nEND:VEVENT\r\n\
END:VCALENDAR\r\n";

async fn feed_host() -> TestUpstream {
    spawn_upstream(
        Router::new()
            .route("/festivos.ics", get(|| async { HOLIDAYS }))
            .route("/linea-rota.ics", get(|| async { BROKEN_LINE }))
            .route("/page.html", get(|| async { "<html><body>hola</body></html>" })),
    )
    .await
}

#[derive(Default, Clone)]
struct Recorded {
    calendars: Arc<Mutex<Vec<Value>>>,
    events: Arc<Mutex<Vec<Value>>>,
}

async fn kalendas(recorded: Recorded, calendar_id: Uuid) -> TestUpstream {
    let calendars = recorded.calendars.clone();
    let events = recorded.events.clone();
    spawn_upstream(
        Router::new()
            .route(
                "/calendars/",
                post(move |Json(body): Json<Value>| async move {
                    calendars.lock().unwrap().push(body.clone());
                    let mut created = body;
                    created["_id"] = json!(calendar_id);
                    (StatusCode::CREATED, Json(created))
                }),
            )
            .route(
                "/events/",
                post(move |Json(body): Json<Value>| async move {
                    events.lock().unwrap().push(body.clone());
                    (StatusCode::CREATED, Json(body))
                }),
            ),
    )
    .await
}

fn app(kalendas_url: String) -> Router {
    let timeout = Duration::from_secs(5);
    let feed = HttpFeedSource::new(timeout).unwrap();
    let client = HttpKalendasClient::new(
        UpstreamConfig::new("calendar", kalendas_url.clone(), timeout),
        UpstreamConfig::new("event", kalendas_url, timeout),
    )
    .unwrap();
    handlers::router(ImportService::new(feed, client))
}

async fn import(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/import/ical")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn request_for(url: String) -> Value {
    json!({
        "url": url,
        "titulo_importado": "Festivos España 2025",
        "organizador": "OfficeHolidays",
        "email_organizador": "festivos@example.com"
    })
}

#[tokio::test]
async fn test_import_counts_valid_and_malformed_events() {
    let feed = feed_host().await;
    let recorded = Recorded::default();
    let calendar_id = Uuid::new_v4();
    let services = kalendas(recorded.clone(), calendar_id).await;

    let (status, body) = import(&app(services.base_url()), request_for(feed.url("/festivos.ics"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calendar_id"], calendar_id.to_string());
    assert_eq!(body["events_imported"], 2);
    assert_eq!(body["events_failed"], 1);
    assert_eq!(body["message"], "Import finished. Imported: 2. Failed: 1");

    let calendars = recorded.calendars.lock().unwrap();
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0]["titulo"], "Festivos España 2025");
    assert_eq!(calendars[0]["es_publico"], true);

    let events = recorded.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["titulo"], "Año Nuevo");
    assert_eq!(events[0]["horaComienzo"], "2025-01-01T00:00:00");
    assert_eq!(events[0]["duracionMinutos"], 1440);
    assert_eq!(events[0]["lugar"], "Remoto");
    assert_eq!(events[1]["lugar"], "España");
    assert_eq!(events[1]["horaComienzo"], "2025-01-06T09:00:00");
    assert_eq!(events[1]["duracionMinutos"], 60);
    assert!(events.iter().all(|e| e["idCalendario"] == calendar_id.to_string()));
    assert!(events.iter().all(|e| e["emailOrganizador"] == "festivos@example.com"));
}

#[tokio::test]
async fn test_broken_line_fails_only_its_event() {
    let feed = feed_host().await;
    let recorded = Recorded::default();
    let calendar_id = Uuid::new_v4();
    let services = kalendas(recorded.clone(), calendar_id).await;

    let (status, body) = import(&app(services.base_url()), request_for(feed.url("/linea-rota.ics"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calendar_id"], calendar_id.to_string());
    assert_eq!(body["events_imported"], 2);
    assert_eq!(body["events_failed"], 1);
    assert_eq!(recorded.calendars.lock().unwrap().len(), 1);

    let titles: Vec<Value> = recorded
        .events
        .lock()
        .unwrap()
        .iter()
        .map(|e| e["titulo"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Año Nuevo"), json!("Día de Reyes")]);
}

#[tokio::test]
async fn test_non_calendar_content_is_unprocessable() {
    let feed = feed_host().await;
    let recorded = Recorded::default();
    let services = kalendas(recorded.clone(), Uuid::new_v4()).await;

    let (status, body) = import(&app(services.base_url()), request_for(feed.url("/page.html"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The file is not a valid .ics calendar");
    assert!(recorded.calendars.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_download_failure_is_bad_request() {
    let feed = feed_host().await;
    let services = kalendas(Recorded::default(), Uuid::new_v4()).await;

    let (status, body) = import(&app(services.base_url()), request_for(feed.url("/missing.ics"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error downloading external URL")
    );
}

#[tokio::test]
async fn test_calendar_service_down_is_server_error() {
    let feed = feed_host().await;

    let (status, body) = import(
        &app(unreachable_base_url().await),
        request_for(feed.url("/festivos.ics")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error creating internal calendar")
    );
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_download() {
    let services = kalendas(Recorded::default(), Uuid::new_v4()).await;

    let (status, _) = import(
        &app(services.base_url()),
        json!({ "url": "no es una url", "titulo_importado": "ab", "organizador": "X" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
