use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Calendar not found: {0}")]
    NotFound(Uuid),

    #[error("No subcalendars found for calendar {0}")]
    NoSubcalendars(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CalendarResult<T> = Result<T, CalendarError>;

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NotFound(id) => AppError::NotFound(format!("Calendar {} not found", id)),
            CalendarError::NoSubcalendars(id) => {
                AppError::NotFound(format!("No subcalendars found for calendar {}", id))
            }
            CalendarError::Validation(msg) => AppError::BadRequest(msg),
            CalendarError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CalendarError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CalendarError {
    fn from(err: mongodb::error::Error) -> Self {
        CalendarError::Database(err.to_string())
    }
}
