//! MongoDB implementations of the comment, preference and notification repositories

use async_trait::async_trait;
use database::mongodb::{from_bson_datetime, from_bson_uuid, id_filter, to_bson_datetime, to_bson_uuid};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, CommentFilter, Notification, NotificationPreference, UpdateComment};
use crate::repository::{CommentRepository, NotificationRepository, PreferenceRepository};

pub const COMMENTS_COLLECTION: &str = "comentarios";
pub const USERS_COLLECTION: &str = "users";
pub const NOTIFICATIONS_COLLECTION: &str = "notificaciones";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommentDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    contenido: String,
    #[serde(rename = "idCalendario", default)]
    id_calendario: Option<bson::Uuid>,
    #[serde(rename = "idEvento", default)]
    id_evento: Option<bson::Uuid>,
    #[serde(rename = "fechaCreacion")]
    fecha_creacion: bson::DateTime,
}

impl From<&Comment> for CommentDocument {
    fn from(comment: &Comment) -> Self {
        Self {
            id: to_bson_uuid(comment.id),
            contenido: comment.content.clone(),
            id_calendario: comment.calendar_id.map(to_bson_uuid),
            id_evento: comment.event_id.map(to_bson_uuid),
            fecha_creacion: to_bson_datetime(comment.created_at),
        }
    }
}

impl TryFrom<CommentDocument> for Comment {
    type Error = CommentError;

    fn try_from(doc: CommentDocument) -> CommentResult<Self> {
        let created_at = from_bson_datetime(doc.fecha_creacion).ok_or_else(|| {
            CommentError::Validation("Stored comment has an out-of-range fechaCreacion".into())
        })?;

        Ok(Self {
            id: from_bson_uuid(doc.id),
            content: doc.contenido,
            calendar_id: doc.id_calendario.map(from_bson_uuid),
            event_id: doc.id_evento.map(from_bson_uuid),
            created_at,
        })
    }
}

fn decode(document: Document) -> CommentResult<Comment> {
    bson::from_document::<CommentDocument>(document)
        .map_err(|e| CommentError::Validation(format!("Stored comment is malformed: {}", e)))?
        .try_into()
}

/// MongoDB implementation of the CommentRepository
pub struct MongoCommentRepository {
    collection: Collection<Document>,
}

impl MongoCommentRepository {
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, COMMENTS_COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Document>(collection_name);
        Self { collection }
    }

    fn build_filter(filter: &CommentFilter) -> Document {
        let mut doc = doc! {};
        if let Some(calendar_id) = filter.calendar_id {
            doc.insert("idCalendario", to_bson_uuid(calendar_id));
        }
        if let Some(event_id) = filter.event_id {
            doc.insert("idEvento", to_bson_uuid(event_id));
        }
        doc
    }

    fn build_update(update: &UpdateComment) -> Document {
        let mut set = doc! {};
        if let Some(ref content) = update.content {
            set.insert("contenido", content);
        }
        if let Some(calendar_id) = update.calendar_id {
            set.insert("idCalendario", to_bson_uuid(calendar_id));
        }
        if let Some(event_id) = update.event_id {
            set.insert("idEvento", to_bson_uuid(event_id));
        }
        set
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn insert(&self, comment: Comment) -> CommentResult<Comment> {
        let document = bson::to_document(&CommentDocument::from(&comment))
            .map_err(|e| CommentError::Database(e.to_string()))?;
        self.collection.insert_one(document).await?;

        tracing::info!(comment_id = %comment.id, "Comment created");
        Ok(comment)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CommentResult<Option<Comment>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(decode)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CommentFilter) -> CommentResult<Vec<Comment>> {
        let documents: Vec<Document> = self
            .collection
            .find(Self::build_filter(&filter))
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(decode).collect()
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: UpdateComment) -> CommentResult<Option<Comment>> {
        let set = Self::build_update(&update);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        self.collection
            .find_one_and_update(id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .map(decode)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CommentResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(comment_id = %id, "Comment deleted");
        }
        Ok(result.deleted_count > 0)
    }
}

/// Preferences in the `users` collection, one document per email
pub struct MongoPreferenceRepository {
    collection: Collection<Document>,
}

impl MongoPreferenceRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Document>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl PreferenceRepository for MongoPreferenceRepository {
    #[instrument(skip(self))]
    async fn get(&self, email: &str) -> CommentResult<Option<NotificationPreference>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;

        Ok(user.map(|user| {
            user.get_str("notification_pref")
                .map(|pref| NotificationPreference::from(pref.to_string()))
                .unwrap_or_default()
        }))
    }

    #[instrument(skip(self))]
    async fn upsert(&self, email: &str, preference: NotificationPreference) -> CommentResult<()> {
        self.collection
            .update_one(
                doc! { "email": email },
                doc! { "$set": { "notification_pref": preference.as_str(), "email": email } },
            )
            .upsert(true)
            .await?;

        tracing::info!(preference = preference.as_str(), "Notification preference stored");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NotificationDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    user_email: String,
    message: String,
    event_id: bson::Uuid,
    #[serde(default)]
    read: bool,
    created_at: bson::DateTime,
}

impl From<&Notification> for NotificationDocument {
    fn from(notification: &Notification) -> Self {
        Self {
            id: to_bson_uuid(notification.id),
            user_email: notification.user_email.clone(),
            message: notification.message.clone(),
            event_id: to_bson_uuid(notification.event_id),
            read: notification.read,
            created_at: to_bson_datetime(notification.created_at),
        }
    }
}

fn decode_notification(document: Document) -> CommentResult<Notification> {
    let doc = bson::from_document::<NotificationDocument>(document)
        .map_err(|e| CommentError::Validation(format!("Stored notification is malformed: {}", e)))?;
    let created_at = from_bson_datetime(doc.created_at).ok_or_else(|| {
        CommentError::Validation("Stored notification has an out-of-range created_at".into())
    })?;

    Ok(Notification {
        id: from_bson_uuid(doc.id),
        user_email: doc.user_email,
        message: doc.message,
        event_id: from_bson_uuid(doc.event_id),
        read: doc.read,
        created_at,
    })
}

/// In-app notifications in the `notificaciones` collection
pub struct MongoNotificationRepository {
    collection: Collection<Document>,
}

impl MongoNotificationRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Document>(NOTIFICATIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    #[instrument(skip(self, notification), fields(notification_id = %notification.id))]
    async fn insert(&self, notification: Notification) -> CommentResult<()> {
        let document = bson::to_document(&NotificationDocument::from(&notification))
            .map_err(|e| CommentError::Database(e.to_string()))?;
        self.collection.insert_one(document).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for(&self, email: &str, limit: i64) -> CommentResult<Vec<Notification>> {
        let documents: Vec<Document> = self
            .collection
            .find(doc! { "user_email": email })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(decode_notification).collect()
    }
}
