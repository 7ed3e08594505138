//! # Axum Helpers
//!
//! Shared HTTP plumbing for the Kalendas services.
//!
//! - **[`errors`]**: `AppError` and the `{code, error, message, details}` body
//! - **[`extractors`]**: `UuidPath`, `ValidatedJson`
//! - **[`server`]**: router assembly, `/health`, readiness aggregation, graceful shutdown
//! - **[`http`]**: CORS, security headers, forwarded identity headers
//! - **[`auth`]**: HS256 bearer-token verification
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthError, JwtAuth, JwtClaims, JwtConfig};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    docs_router, health_router, run_health_checks, shutdown_signal, trace_layer,
};

pub use http::{
    USER_EMAIL_HEADER, USER_NAME_HEADER, author_from_headers, security_headers, strip_diacritics,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
