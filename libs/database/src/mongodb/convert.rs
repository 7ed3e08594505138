//! Conversions between domain types and their BSON storage form.
//!
//! Ids are stored as binary subtype 4 UUIDs. Timestamps are stored as BSON
//! datetimes; naive wall-clock values are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use mongodb::bson::{self, Bson, Document, doc};
use uuid::Uuid;

pub fn to_bson_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

pub fn from_bson_uuid(id: bson::Uuid) -> Uuid {
    Uuid::from_bytes(id.bytes())
}

/// `{"_id": <uuid>}`
pub fn id_filter(id: Uuid) -> Document {
    doc! { "_id": to_bson_uuid(id) }
}

/// `Bson` array of UUIDs, for `$in` filters.
pub fn uuid_array(ids: &[Uuid]) -> Bson {
    Bson::Array(ids.iter().map(|id| Bson::from(to_bson_uuid(*id))).collect())
}

pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

pub fn from_bson_datetime(value: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis())
}

pub fn naive_to_bson(value: NaiveDateTime) -> bson::DateTime {
    bson::DateTime::from_millis(value.and_utc().timestamp_millis())
}

pub fn bson_to_naive(value: bson::DateTime) -> Option<NaiveDateTime> {
    from_bson_datetime(value).map(|dt| dt.naive_utc())
}
