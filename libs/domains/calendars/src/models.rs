use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Calendar entity
///
/// `parent_id` forms a tree; cycles and dangling parents are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Calendar {
    /// Unique identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "organizador")]
    pub organizer: String,
    #[serde(rename = "palabras_clave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "es_publico", default = "default_public")]
    pub is_public: bool,
    /// Parent calendar, if this is a subcalendar
    #[serde(rename = "idCalendarioPadre", default)]
    pub parent_id: Option<Uuid>,
}

/// DTO for creating a calendar
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCalendar {
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "titulo must have at least 3 characters"))]
    pub title: String,
    #[serde(rename = "organizador")]
    pub organizer: String,
    #[serde(rename = "palabras_clave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "es_publico", default = "default_public")]
    pub is_public: bool,
    #[serde(rename = "idCalendarioPadre", default)]
    pub parent_id: Option<Uuid>,
}

/// DTO for a partial update. Absent fields are left untouched.
///
/// `idCalendarioPadre: null` detaches the calendar from its parent, which is
/// different from leaving the field out.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCalendar {
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "titulo must have at least 3 characters"))]
    pub title: Option<String>,
    #[serde(rename = "organizador")]
    pub organizer: Option<String>,
    #[serde(rename = "palabras_clave")]
    pub keywords: Option<Vec<String>>,
    #[serde(rename = "es_publico")]
    pub is_public: Option<bool>,
    #[serde(rename = "idCalendarioPadre", default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
}

impl UpdateCalendar {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.organizer.is_none()
            && self.keywords.is_none()
            && self.is_public.is_none()
            && self.parent_id.is_none()
    }
}

/// Query filters for listing calendars
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarFilter {
    /// Case-insensitive substring of the title
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    /// Case-insensitive substring of the organizer
    #[serde(rename = "organizador")]
    pub organizer: Option<String>,
    /// Calendars carrying any of these keywords (repeatable)
    #[serde(rename = "palabras_clave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "es_publico")]
    pub is_public: Option<bool>,
}

fn default_public() -> bool {
    true
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Calendar {
    /// Create a new calendar with a fresh id
    pub fn new(input: CreateCalendar) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            organizer: input.organizer,
            keywords: input.keywords,
            is_public: input.is_public,
            parent_id: input.parent_id,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCalendar) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(organizer) = update.organizer {
            self.organizer = organizer;
        }
        if let Some(keywords) = update.keywords {
            self.keywords = keywords;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        if let Some(parent_id) = update.parent_id {
            self.parent_id = parent_id;
        }
    }
}
