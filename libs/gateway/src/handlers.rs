use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    response::Response,
    routing::get,
};
use axum_helpers::errors::responses::{
    InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::provenance::AuthPolicy;
use crate::proxy::{ForwardRequest, Proxy, forwardable_headers};
use crate::registry::ServiceRegistry;

#[derive(OpenApi)]
#[openapi(
    paths(welcome, proxy),
    components(
        schemas(Welcome),
        responses(UnauthorizedResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Gateway", description = "Single entry point for the Kalendas services")
    )
)]
pub struct ApiDoc;

/// Shared per-process gateway state
#[derive(Clone)]
pub struct GatewayState {
    pub registry: ServiceRegistry,
    pub policy: AuthPolicy,
    pub proxy: Proxy,
    pub max_body_bytes: usize,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            registry: config.registry.clone(),
            policy: config.auth_policy(),
            proxy: Proxy::new(config.upstream_timeout)?,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct Welcome {
    pub message: String,
}

/// `GET /` plus the proxy as fallback for every other path.
///
/// The fallback sees the original URI, so `/event/events/` reaches the
/// upstream as `/events/` with its trailing slash.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .fallback(proxy)
        .with_state(Arc::new(state))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Gateway",
    responses((status = 200, description = "Welcome message", body = Welcome))
)]
async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Bienvenido a la API de Kalendas. Visita /swagger-ui para ver la documentación."
            .to_string(),
    })
}

/// Forward to `{service}` with the remaining path
///
/// Requests marked by the frontend pass straight through. Anything else needs
/// `Authorization: Bearer <token>`.
#[utoipa::path(
    method(get, post, put, delete),
    path = "/{service}/{path}",
    tag = "Gateway",
    params(
        ("service" = String, Path, description = "calendar, event, comment or external"),
        ("path" = String, Path, description = "Path on the target service")
    ),
    responses(
        (status = 200, description = "Whatever the target service returned"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 405, description = "Method not accepted by the target service"),
        (status = 413, description = "Request body too large"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn proxy(
    State(state): State<Arc<GatewayState>>,
    request: Request,
) -> GatewayResult<Response> {
    let (parts, body) = request.into_parts();
    let (service, rest) = split_service(parts.uri.path());

    let entry = state
        .registry
        .resolve(service)
        .ok_or_else(|| GatewayError::UnknownService(service.to_string()))?;

    if !entry.allows(&parts.method) {
        return Err(GatewayError::MethodNotAllowed {
            service: entry.name.clone(),
            method: parts.method.to_string(),
        });
    }

    let provenance = state.policy.classify(&parts.headers)?;

    let body = read_body(body, state.max_body_bytes).await?;
    let mut headers = forwardable_headers(&parts.headers);
    provenance.apply_identity(&mut headers);

    state
        .proxy
        .forward(
            entry,
            ForwardRequest {
                method: parts.method.clone(),
                rest: rest.to_string(),
                query: parts.uri.query().map(str::to_string),
                headers,
                body,
            },
        )
        .await
}

/// `/event/events/` → `("event", "events/")`; `/event` → `("event", "")`
fn split_service(path: &str) -> (&str, &str) {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split_once('/').unwrap_or((path, ""))
}

async fn read_body(body: Body, limit: usize) -> GatewayResult<axum::body::Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if exceeded_limit(&e) {
            GatewayError::PayloadTooLarge(limit)
        } else {
            GatewayError::BadBody(e.to_string())
        }
    })
}

fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<http_body_util::LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
