//! Gateway forwarding against an in-process echo upstream.

use axum::{
    Json, Router,
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, Method, Request, StatusCode, Uri},
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{JwtAuth, JwtConfig};
use gateway::{AuthPolicy, GatewayState, Proxy, ServiceRegistry, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use test_utils::{TestUpstream, spawn_upstream, unreachable_base_url};
use tower::ServiceExt;

const SECRET: &str = "gateway-proxy-test-secret-32-chars!!";
const MARKER: &str = "x-internal-frontend";

/// Echoes what it received, and counts calls
async fn echo_upstream(calls: Arc<AtomicUsize>) -> TestUpstream {
    let echo = move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let mut response_headers = HeaderMap::new();
            response_headers.insert("x-upstream", "echo".parse().unwrap());
            (
                StatusCode::CREATED,
                response_headers,
                Json(json!({
                    "method": method.as_str(),
                    "path": uri.path(),
                    "query": uri.query(),
                    "user_email": header("x-user-email"),
                    "user_name": header("x-user-name"),
                    "authorization": header("authorization"),
                    "body": String::from_utf8_lossy(&body),
                })),
            )
                .into_response()
        }
    };
    spawn_upstream(Router::new().fallback(echo)).await
}

fn jwt() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
}

fn gateway(base_url: &str, max_body_bytes: usize) -> Router {
    let state = GatewayState {
        registry: ServiceRegistry::kalendas(base_url, base_url, base_url, base_url),
        policy: AuthPolicy::new(HeaderName::from_static(MARKER), None, jwt()),
        proxy: Proxy::new(Duration::from_secs(5)).unwrap(),
        max_body_bytes,
    };
    router(state)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

fn internal(method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(MARKER, "1")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_internal_request_keeps_trailing_slash_and_query() {
    let calls = Arc::new(AtomicUsize::new(0));
    let upstream = echo_upstream(calls.clone()).await;
    let app = gateway(&upstream.base_url(), 1024);

    let (status, headers, body) = call(
        &app,
        internal("GET", "/event/events/?lugar=Madrid&titulo=Feria", Body::empty()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers["x-upstream"], "echo");
    assert_eq!(body["path"], "/events/");
    assert_eq!(body["query"], "lugar=Madrid&titulo=Feria");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (_, _, item) = call(&app, internal("GET", "/event/events/42", Body::empty())).await;
    assert_eq!(item["path"], "/events/42");
    assert_eq!(item["query"], Value::Null);
}

#[tokio::test]
async fn test_body_and_method_are_forwarded() {
    let upstream = echo_upstream(Arc::new(AtomicUsize::new(0))).await;
    let app = gateway(&upstream.base_url(), 1024);

    let (status, _, body) = call(
        &app,
        internal("PUT", "/calendar/calendars/7", Body::from(r#"{"titulo":"Nuevo"}"#)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["body"], r#"{"titulo":"Nuevo"}"#);
}

#[tokio::test]
async fn test_unknown_service_is_404_without_forwarding() {
    let calls = Arc::new(AtomicUsize::new(0));
    let upstream = echo_upstream(calls.clone()).await;
    let app = gateway(&upstream.base_url(), 1024);

    let (status, _, body) = call(&app, internal("GET", "/users/me", Body::empty())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Service 'users' not found");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_external_service_is_post_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let upstream = echo_upstream(calls.clone()).await;
    let app = gateway(&upstream.base_url(), 1024);

    let (status, _, _) = call(&app, internal("GET", "/external/import/ical", Body::empty())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (status, _, body) = call(&app, internal("POST", "/external/import/ical", Body::from("{}"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["path"], "/import/ical");
}

#[tokio::test]
async fn test_method_check_precedes_auth() {
    let upstream = echo_upstream(Arc::new(AtomicUsize::new(0))).await;
    let app = gateway(&upstream.base_url(), 1024);

    let request = Request::builder()
        .method("PATCH")
        .uri("/event/events/1")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_untrusted_without_token_is_401_without_forwarding() {
    let calls = Arc::new(AtomicUsize::new(0));
    let upstream = echo_upstream(calls.clone()).await;
    let app = gateway(&upstream.base_url(), 1024);

    for authorization in [None, Some("Basic abc"), Some("Bearer not-a-jwt")] {
        let mut request = Request::builder().uri("/calendar/calendars/");
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }
        let (status, _, body) = call(&app, request.body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_external_identity_comes_from_token() {
    let upstream = echo_upstream(Arc::new(AtomicUsize::new(0))).await;
    let app = gateway(&upstream.base_url(), 1024);
    let token = jwt()
        .create_token("u-7", "jose@example.com", "José Muñoz", &[], 300)
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/comment/comments/")
        .header("authorization", format!("Bearer {token}"))
        .header("x-user-email", "spoof@example.com")
        .header("x-user-name", "Spoofer")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _, body) = call(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_email"], "jose@example.com");
    assert_eq!(body["user_name"], "Jose Munoz");
    assert_eq!(body["authorization"], format!("Bearer {token}"));
}

#[tokio::test]
async fn test_internal_identity_passes_through() {
    let upstream = echo_upstream(Arc::new(AtomicUsize::new(0))).await;
    let app = gateway(&upstream.base_url(), 1024);

    let request = Request::builder()
        .method("POST")
        .uri("/comment/comments/")
        .header(MARKER, "1")
        .header("x-user-name", "Ana")
        .body(Body::from("{}"))
        .unwrap();
    let (_, _, body) = call(&app, request).await;

    assert_eq!(body["user_name"], "Ana");
    assert_eq!(body["user_email"], Value::Null);
}

#[tokio::test]
async fn test_upstream_status_is_relayed() {
    let upstream = spawn_upstream(Router::new().route(
        "/events/",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "message": "titulo too short" }))) }),
    ))
    .await;
    let app = gateway(&upstream.base_url(), 1024);

    let (status, _, body) = call(&app, internal("POST", "/event/events/", Body::from("{}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "titulo too short");
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let app = gateway(&unreachable_base_url().await, 1024);

    let (status, _, body) = call(&app, internal("GET", "/calendar/calendars/", Body::empty())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error connecting to calendar")
    );
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let calls = Arc::new(AtomicUsize::new(0));
    let upstream = echo_upstream(calls.clone()).await;
    let app = gateway(&upstream.base_url(), 16);

    let (status, _, _) = call(
        &app,
        internal("POST", "/event/events/", Body::from("x".repeat(64))),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_welcome() {
    let app = gateway("http://unused", 1024);
    let (status, _, body) = call(
        &app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Bienvenido"));
}
