//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use database::mongodb::{bson_to_naive, from_bson_uuid, id_filter, naive_to_bson, to_bson_uuid, uuid_array};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{Attachments, Event, EventFilter, UpdateEvent};
use crate::repository::EventRepository;

pub const COLLECTION: &str = "eventos";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    #[serde(rename = "idCalendario")]
    id_calendario: bson::Uuid,
    titulo: String,
    #[serde(rename = "horaComienzo")]
    hora_comienzo: bson::DateTime,
    #[serde(rename = "duracionMinutos")]
    duracion_minutos: i32,
    lugar: String,
    organizador: String,
    #[serde(rename = "emailOrganizador", default, skip_serializing_if = "Option::is_none")]
    email_organizador: Option<String>,
    #[serde(rename = "contenidoAdjunto", default)]
    contenido_adjunto: Attachments,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: to_bson_uuid(event.id),
            id_calendario: to_bson_uuid(event.calendar_id),
            titulo: event.title.clone(),
            hora_comienzo: naive_to_bson(event.starts_at),
            duracion_minutos: event.duration_minutes,
            lugar: event.location.clone(),
            organizador: event.organizer.clone(),
            email_organizador: event.organizer_email.clone(),
            contenido_adjunto: event.attachments.clone(),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> Result<Self, Self::Error> {
        let starts_at = bson_to_naive(doc.hora_comienzo).ok_or_else(|| {
            EventError::Validation(format!("Stored event {} has an out-of-range start", doc.id))
        })?;

        Ok(Self {
            id: from_bson_uuid(doc.id),
            calendar_id: from_bson_uuid(doc.id_calendario),
            title: doc.titulo,
            starts_at,
            duration_minutes: doc.duracion_minutos,
            location: doc.lugar,
            organizer: doc.organizador,
            organizer_email: doc.email_organizador,
            attachments: doc.contenido_adjunto,
        })
    }
}

fn decode(document: Document) -> EventResult<Event> {
    bson::from_document::<EventDocument>(document)
        .map_err(|e| EventError::Validation(format!("Stored event is malformed: {}", e)))?
        .try_into()
}

fn text_match(value: &str) -> Document {
    doc! { "$regex": regex::escape(value), "$options": "i" }
}

pub struct MongoEventRepository {
    collection: Collection<Document>,
}

impl MongoEventRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Document>(collection_name),
        }
    }

    /// Build a MongoDB filter document from EventFilter
    ///
    /// Text predicates are matched as literal substrings.
    fn build_filter(filter: &EventFilter) -> Document {
        let mut doc = doc! {};

        let mut start = doc! {};
        if let Some(from) = filter.fecha_inicio {
            start.insert("$gte", naive_to_bson(from));
        }
        if let Some(to) = filter.fecha_fin {
            start.insert("$lte", naive_to_bson(to));
        }
        if !start.is_empty() {
            doc.insert("horaComienzo", start);
        }

        for (field, value) in [
            ("lugar", &filter.lugar),
            ("organizador", &filter.organizador),
            ("titulo", &filter.titulo),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                doc.insert(field, text_match(value));
            }
        }

        let mut duration = doc! {};
        if let Some(min) = filter.duration_minima {
            duration.insert("$gte", min);
        }
        if let Some(max) = filter.duration_maxima {
            duration.insert("$lte", max);
        }
        if !duration.is_empty() {
            doc.insert("duracionMinutos", duration);
        }

        doc
    }

    fn build_update(update: &UpdateEvent) -> EventResult<Document> {
        let mut set = doc! {};

        if let Some(calendar_id) = update.calendar_id {
            set.insert("idCalendario", to_bson_uuid(calendar_id));
        }
        if let Some(ref title) = update.title {
            set.insert("titulo", title);
        }
        if let Some(starts_at) = update.starts_at {
            set.insert("horaComienzo", naive_to_bson(starts_at));
        }
        if let Some(duration) = update.duration_minutes {
            set.insert("duracionMinutos", duration);
        }
        if let Some(ref location) = update.location {
            set.insert("lugar", location);
        }
        if let Some(ref organizer) = update.organizer {
            set.insert("organizador", organizer);
        }
        if let Some(ref email) = update.organizer_email {
            set.insert("emailOrganizador", email);
        }
        if let Some(ref attachments) = update.attachments {
            let value =
                bson::to_bson(attachments).map_err(|e| EventError::Database(e.to_string()))?;
            set.insert("contenidoAdjunto", value);
        }

        Ok(set)
    }

    async fn find_many(&self, filter: Document) -> EventResult<Vec<Event>> {
        let documents: Vec<Document> = self.collection.find(filter).await?.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id, calendar_id = %event.calendar_id))]
    async fn insert(&self, event: Event) -> EventResult<Event> {
        let document = bson::to_document(&EventDocument::from(&event))
            .map_err(|e| EventError::Database(e.to_string()))?;
        self.collection.insert_one(document).await?;

        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(decode)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.find_many(Self::build_filter(&filter)).await
    }

    #[instrument(skip(self), fields(calendars = calendar_ids.len()))]
    async fn list_by_calendars(&self, calendar_ids: Vec<Uuid>) -> EventResult<Vec<Event>> {
        self.find_many(doc! { "idCalendario": { "$in": uuid_array(&calendar_ids) } })
            .await
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: UpdateEvent) -> EventResult<Option<Event>> {
        let set = Self::build_update(&update)?;
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(event_id = %id, "Event updated");
        }
        updated.map(decode).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(event_id = %id, "Event deleted");
        }
        Ok(result.deleted_count > 0)
    }
}
