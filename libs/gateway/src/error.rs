use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Service '{0}' not found")]
    UnknownService(String),

    #[error("Method {method} is not allowed for service '{service}'")]
    MethodNotAllowed { service: String, method: String },

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Could not read request body: {0}")]
    BadBody(String),

    /// Transport failure talking to the upstream; never retried
    #[error("Error connecting to {service}: {message}")]
    Upstream { service: String, message: String },
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err {
            GatewayError::UnknownService(_) => AppError::NotFound(message),
            GatewayError::MethodNotAllowed { .. } => AppError::MethodNotAllowed(message),
            GatewayError::Unauthorized(auth) => auth.into(),
            GatewayError::PayloadTooLarge(_) => AppError::PayloadTooLarge(message),
            GatewayError::BadBody(_) => AppError::BadRequest(message),
            GatewayError::Upstream { .. } => AppError::Upstream(message),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
