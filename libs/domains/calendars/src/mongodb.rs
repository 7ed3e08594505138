//! MongoDB implementation of CalendarRepository

use async_trait::async_trait;
use database::mongodb::{from_bson_uuid, id_filter, to_bson_uuid};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Bson, Document, doc},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CalendarError, CalendarResult};
use crate::models::{Calendar, CalendarFilter, UpdateCalendar};
use crate::repository::CalendarRepository;

pub const COLLECTION: &str = "calendarios";

/// Stored shape of a calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalendarDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    titulo: String,
    organizador: String,
    #[serde(default)]
    palabras_clave: Vec<String>,
    #[serde(default = "default_public")]
    es_publico: bool,
    #[serde(rename = "idCalendarioPadre", default)]
    id_calendario_padre: Option<bson::Uuid>,
}

fn default_public() -> bool {
    true
}

impl From<&Calendar> for CalendarDocument {
    fn from(calendar: &Calendar) -> Self {
        Self {
            id: to_bson_uuid(calendar.id),
            titulo: calendar.title.clone(),
            organizador: calendar.organizer.clone(),
            palabras_clave: calendar.keywords.clone(),
            es_publico: calendar.is_public,
            id_calendario_padre: calendar.parent_id.map(to_bson_uuid),
        }
    }
}

impl From<CalendarDocument> for Calendar {
    fn from(doc: CalendarDocument) -> Self {
        Self {
            id: from_bson_uuid(doc.id),
            title: doc.titulo,
            organizer: doc.organizador,
            keywords: doc.palabras_clave,
            is_public: doc.es_publico,
            parent_id: doc.id_calendario_padre.map(from_bson_uuid),
        }
    }
}

fn decode(document: Document) -> CalendarResult<Calendar> {
    bson::from_document::<CalendarDocument>(document)
        .map(Calendar::from)
        .map_err(|e| CalendarError::Validation(format!("Stored calendar is malformed: {}", e)))
}

/// MongoDB implementation of the CalendarRepository
pub struct MongoCalendarRepository {
    collection: Collection<Document>,
}

impl MongoCalendarRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Document>(collection_name);
        Self { collection }
    }

    /// Build a MongoDB filter document from CalendarFilter
    fn build_filter(filter: &CalendarFilter) -> Document {
        let mut doc = doc! {};

        if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            doc.insert("titulo", doc! { "$regex": regex::escape(title), "$options": "i" });
        }

        if let Some(organizer) = filter.organizer.as_deref().filter(|o| !o.is_empty()) {
            doc.insert(
                "organizador",
                doc! { "$regex": regex::escape(organizer), "$options": "i" },
            );
        }

        if !filter.keywords.is_empty() {
            doc.insert("palabras_clave", doc! { "$in": filter.keywords.clone() });
        }

        if let Some(is_public) = filter.is_public {
            doc.insert("es_publico", is_public);
        }

        doc
    }

    /// `$set` body for a partial update
    fn build_update(update: &UpdateCalendar) -> Document {
        let mut set = doc! {};

        if let Some(ref title) = update.title {
            set.insert("titulo", title);
        }
        if let Some(ref organizer) = update.organizer {
            set.insert("organizador", organizer);
        }
        if let Some(ref keywords) = update.keywords {
            set.insert("palabras_clave", keywords.clone());
        }
        if let Some(is_public) = update.is_public {
            set.insert("es_publico", is_public);
        }
        if let Some(parent_id) = update.parent_id {
            let value = parent_id.map_or(Bson::Null, |id| Bson::from(to_bson_uuid(id)));
            set.insert("idCalendarioPadre", value);
        }

        set
    }

    async fn find_many(&self, filter: Document) -> CalendarResult<Vec<Calendar>> {
        let documents: Vec<Document> = self.collection.find(filter).await?.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }
}

#[async_trait]
impl CalendarRepository for MongoCalendarRepository {
    #[instrument(skip(self, calendar), fields(calendar_id = %calendar.id))]
    async fn insert(&self, calendar: Calendar) -> CalendarResult<Calendar> {
        let document = bson::to_document(&CalendarDocument::from(&calendar))
            .map_err(|e| CalendarError::Database(e.to_string()))?;
        self.collection.insert_one(document).await?;

        tracing::info!(calendar_id = %calendar.id, "Calendar created");
        Ok(calendar)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CalendarResult<Option<Calendar>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(decode)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CalendarFilter) -> CalendarResult<Vec<Calendar>> {
        self.find_many(Self::build_filter(&filter)).await
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: UpdateCalendar) -> CalendarResult<Option<Calendar>> {
        let set = Self::build_update(&update);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(calendar_id = %id, "Calendar updated");
        }
        updated.map(decode).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CalendarResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(calendar_id = %id, "Calendar deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn children_of(&self, parent_id: Uuid) -> CalendarResult<Vec<Calendar>> {
        self.find_many(doc! { "idCalendarioPadre": to_bson_uuid(parent_id) })
            .await
    }
}
