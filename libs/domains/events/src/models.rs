use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Lenient reader for naive start times.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS[.f]` and `YYYY-MM-DDTHH:MM` (a space may stand in
/// for the `T`). RFC 3339 values with an offset keep their UTC wall clock.
pub mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de::Error};

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    fn invalid<E: Error>(raw: &str) -> E {
        E::custom(format!("invalid date-time '{raw}', expected YYYY-MM-DDTHH:MM[:SS]"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| invalid(&raw))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse(&raw).ok_or_else(|| invalid(&raw)))
                .transpose()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapPoint {
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
}

/// Optional content attached to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attachments {
    /// Image URLs
    #[serde(rename = "imagenes", default)]
    pub images: Vec<String>,
    /// File URLs
    #[serde(rename = "archivos", default)]
    pub files: Vec<String>,
    #[serde(rename = "mapa", default)]
    pub map: Option<MapPoint>,
}

/// Event entity
///
/// `starts_at` is a naive wall-clock time, serialized as `YYYY-MM-DDTHH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Owning calendar
    #[serde(rename = "idCalendario")]
    pub calendar_id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "horaComienzo", deserialize_with = "wall_clock::deserialize")]
    pub starts_at: NaiveDateTime,
    #[serde(rename = "duracionMinutos")]
    pub duration_minutes: i32,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "organizador")]
    pub organizer: String,
    /// Where comment notifications are sent
    #[serde(rename = "emailOrganizador", default)]
    pub organizer_email: Option<String>,
    #[serde(rename = "contenidoAdjunto", default)]
    pub attachments: Attachments,
}

/// DTO for creating an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[serde(rename = "idCalendario")]
    pub calendar_id: Uuid,
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "titulo must have at least 3 characters"))]
    pub title: String,
    #[serde(rename = "horaComienzo", deserialize_with = "wall_clock::deserialize")]
    pub starts_at: NaiveDateTime,
    #[serde(rename = "duracionMinutos")]
    #[validate(range(min = 1, message = "duracionMinutos must be greater than 0"))]
    pub duration_minutes: i32,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "organizador")]
    pub organizer: String,
    #[serde(rename = "emailOrganizador", default)]
    #[validate(email(message = "emailOrganizador must be a valid email"))]
    pub organizer_email: Option<String>,
    #[serde(rename = "contenidoAdjunto", default)]
    pub attachments: Attachments,
}

/// DTO for a partial update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[serde(rename = "idCalendario")]
    pub calendar_id: Option<Uuid>,
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "titulo must have at least 3 characters"))]
    pub title: Option<String>,
    #[serde(
        rename = "horaComienzo",
        default,
        deserialize_with = "wall_clock::option::deserialize"
    )]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(rename = "duracionMinutos")]
    #[validate(range(min = 1, message = "duracionMinutos must be greater than 0"))]
    pub duration_minutes: Option<i32>,
    #[serde(rename = "lugar")]
    pub location: Option<String>,
    #[serde(rename = "organizador")]
    pub organizer: Option<String>,
    #[serde(rename = "emailOrganizador")]
    #[validate(email(message = "emailOrganizador must be a valid email"))]
    pub organizer_email: Option<String>,
    #[serde(rename = "contenidoAdjunto")]
    pub attachments: Option<Attachments>,
}

/// Query filters for listing events. All bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    /// Earliest start time (`YYYY-MM-DDTHH:MM[:SS]`)
    #[serde(default, deserialize_with = "wall_clock::option::deserialize")]
    pub fecha_inicio: Option<NaiveDateTime>,
    /// Latest start time (`YYYY-MM-DDTHH:MM[:SS]`)
    #[serde(default, deserialize_with = "wall_clock::option::deserialize")]
    pub fecha_fin: Option<NaiveDateTime>,
    /// Case-insensitive substring of the location
    pub lugar: Option<String>,
    /// Case-insensitive substring of the organizer
    pub organizador: Option<String>,
    /// Case-insensitive substring of the title
    pub titulo: Option<String>,
    pub duration_minima: Option<i32>,
    pub duration_maxima: Option<i32>,
}

impl Event {
    pub fn new(input: CreateEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            calendar_id: input.calendar_id,
            title: input.title,
            starts_at: input.starts_at,
            duration_minutes: input.duration_minutes,
            location: input.location,
            organizer: input.organizer,
            organizer_email: input.organizer_email,
            attachments: input.attachments,
        }
    }

    pub fn apply_update(&mut self, update: UpdateEvent) {
        if let Some(calendar_id) = update.calendar_id {
            self.calendar_id = calendar_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(starts_at) = update.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(duration) = update.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(organizer) = update.organizer {
            self.organizer = organizer;
        }
        if let Some(email) = update.organizer_email {
            self.organizer_email = Some(email);
        }
        if let Some(attachments) = update.attachments {
            self.attachments = attachments;
        }
    }
}
