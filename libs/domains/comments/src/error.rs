use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The event service could not be reached
    #[error("Event service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Email provider rejected or failed to deliver a message
    #[error("Email delivery failed: {0}")]
    Email(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CommentResult<T> = Result<T, CommentError>;

impl From<CommentError> for AppError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFound(id) => AppError::NotFound(format!("Comment {} not found", id)),
            CommentError::Validation(msg) => AppError::BadRequest(msg),
            CommentError::UpstreamUnavailable(msg) => AppError::ServiceUnavailable(msg),
            CommentError::Email(msg) => AppError::Upstream(msg),
            CommentError::Config(msg) => AppError::InternalServerError(msg),
            CommentError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CommentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CommentError {
    fn from(err: mongodb::error::Error) -> Self {
        CommentError::Database(err.to_string())
    }
}

impl From<reqwest::Error> for CommentError {
    fn from(err: reqwest::Error) -> Self {
        CommentError::UpstreamUnavailable(err.to_string())
    }
}
