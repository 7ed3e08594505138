use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request to import an external iCalendar feed
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ImportRequest {
    /// Feed URL (`.ics`)
    #[validate(url(message = "url must be a valid URL"))]
    #[schema(example = "https://www.officeholidays.com/ics/spain")]
    pub url: String,
    /// Title of the calendar that will hold the imported events
    #[validate(length(min = 3, message = "titulo_importado must have at least 3 characters"))]
    #[schema(example = "Festivos España 2025")]
    pub titulo_importado: String,
    pub organizador: String,
    /// Copied to every imported event when present
    #[validate(email(message = "email_organizador must be a valid email"))]
    #[serde(default)]
    pub email_organizador: Option<String>,
}

/// Outcome of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub message: String,
    pub calendar_id: Uuid,
    pub events_imported: u32,
    pub events_failed: u32,
}

impl ImportSummary {
    pub fn new(calendar_id: Uuid, events_imported: u32, events_failed: u32) -> Self {
        Self {
            message: format!(
                "Import finished. Imported: {}. Failed: {}",
                events_imported, events_failed
            ),
            calendar_id,
            events_imported,
            events_failed,
        }
    }
}

/// Payload for the container calendar, as the calendar service expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCalendar {
    pub titulo: String,
    pub organizador: String,
    pub palabras_clave: Vec<String>,
    pub es_publico: bool,
    #[serde(rename = "idCalendarioPadre")]
    pub id_calendario_padre: Option<Uuid>,
}

impl NewCalendar {
    /// Public, top-level calendar tagged as imported
    pub fn imported(title: &str, organizer: &str) -> Self {
        Self {
            titulo: title.to_string(),
            organizador: organizer.to_string(),
            palabras_clave: vec!["importado".to_string(), "externo".to_string()],
            es_publico: true,
            id_calendario_padre: None,
        }
    }
}

/// A VEVENT translated into Kalendas terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub title: String,
    pub starts_at: NaiveDateTime,
    pub duration_minutes: i32,
    pub location: String,
}

/// Payload for one event, as the event service expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    #[serde(rename = "idCalendario")]
    pub id_calendario: Uuid,
    pub titulo: String,
    #[serde(rename = "horaComienzo", with = "naive_iso")]
    pub hora_comienzo: NaiveDateTime,
    #[serde(rename = "duracionMinutos")]
    pub duracion_minutos: i32,
    pub lugar: String,
    pub organizador: String,
    #[serde(rename = "emailOrganizador", skip_serializing_if = "Option::is_none")]
    pub email_organizador: Option<String>,
    #[serde(rename = "contenidoAdjunto")]
    pub contenido_adjunto: serde_json::Value,
}

impl NewEvent {
    pub fn from_feed(event: FeedEvent, calendar_id: Uuid, request: &ImportRequest) -> Self {
        Self {
            id_calendario: calendar_id,
            titulo: event.title,
            hora_comienzo: event.starts_at,
            duracion_minutos: event.duration_minutes,
            lugar: event.location,
            organizador: request.organizador.clone(),
            email_organizador: request.email_organizador.clone(),
            contenido_adjunto: serde_json::json!({
                "imagenes": [],
                "archivos": [],
                "mapa": null
            }),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS`, the wall-clock format of `horaComienzo`
mod naive_iso {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}
