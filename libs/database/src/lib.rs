//! Database connectors and helpers for the Kalendas services.
//!
//! # Features
//!
//! - `mongodb` - MongoDB connection, health check and BSON conversion helpers
//! - `config` - `core_config::FromEnv` support for `MongoConfig`
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//! use database::common::RetryConfig;
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, Some(RetryConfig::startup())).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;
