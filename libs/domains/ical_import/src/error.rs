use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The feed URL could not be fetched
    #[error("Error downloading external URL: {0}")]
    Download(String),

    #[error("The file is not a valid .ics calendar")]
    InvalidFeed,

    /// The container calendar could not be created; no events were attempted
    #[error("Error creating internal calendar: {0}")]
    CalendarCreation(String),

    /// The event service answered something other than 201
    #[error("Event rejected with status {status}: {body}")]
    EventRejected { status: StatusCode, body: String },

    #[error("Upstream service unavailable: {0}")]
    Upstream(String),
}

pub type ImportResult<T> = Result<T, ImportError>;

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::Validation(msg) => AppError::BadRequest(msg),
            ImportError::Download(_) => AppError::BadRequest(message),
            ImportError::InvalidFeed => AppError::UnprocessableEntity(message),
            ImportError::CalendarCreation(_) => AppError::InternalServerError(message),
            ImportError::EventRejected { .. } | ImportError::Upstream(_) => {
                AppError::Upstream(message)
            }
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
