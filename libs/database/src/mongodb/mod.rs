//! MongoDB connection management and storage helpers.

mod config;
mod connector;
pub mod convert;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry};
pub use convert::{
    bson_to_naive, from_bson_datetime, from_bson_uuid, id_filter, naive_to_bson,
    to_bson_datetime, to_bson_uuid, uuid_array,
};
pub use health::check_health;

pub use mongodb::{Client, Collection, Database};
