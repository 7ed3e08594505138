use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The calendar service could not be reached or answered with an error
    #[error("Calendar service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Image upload was requested but the host is missing or failed
    #[error("Image host unavailable: {0}")]
    ImageHost(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::UpstreamUnavailable(msg) => AppError::ServiceUnavailable(msg),
            EventError::ImageHost(msg) => AppError::ServiceUnavailable(msg),
            EventError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}
