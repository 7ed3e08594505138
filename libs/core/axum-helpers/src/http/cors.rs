use axum::http::{HeaderName, HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use super::identity::{USER_EMAIL_HEADER, USER_NAME_HEADER};

/// CORS layer for the given origins.
///
/// Allows the REST verbs used by Kalendas, the identity headers and credentials.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            HeaderName::from_static(USER_NAME_HEADER),
            HeaderName::from_static(USER_EMAIL_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Build a CORS layer from comma-separated `CORS_ALLOWED_ORIGIN`.
///
/// Returns `Ok(None)` when the variable is unset or blank: services that only
/// sit behind the gateway do not need CORS.
pub fn cors_layer_from_env() -> io::Result<Option<CorsLayer>> {
    let Some(origins) = core_config::env_optional("CORS_ALLOWED_ORIGIN") else {
        return Ok(None);
    };

    let allowed_origins = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
            )
        })?;

    info!("CORS configured with allowed origins: {}", origins);
    Ok(Some(create_cors_layer(allowed_origins)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_means_no_layer() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(cors_layer_from_env().unwrap().is_none());
        });
    }

    #[test]
    fn test_list_of_origins() {
        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("http://localhost:3000, https://kalendas.example"),
            || {
                assert!(cors_layer_from_env().unwrap().is_some());
            },
        );
    }
}
