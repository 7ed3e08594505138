//! Shared test utilities for the Kalendas crates
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongodb")
//! - `spawn_upstream`: serve an axum router on a random local port
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ## MongoDB Testing
//!
//! Container tests need Docker and are marked `#[ignore]`:
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires docker"]
//! async fn my_repository_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database();
//!     let builder = TestDataBuilder::from_test_name("my_repository_test");
//!     let title = builder.name("calendar", "main");
//! }
//! ```
//!
//! ## Cross-service Testing
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use test_utils::spawn_upstream;
//!
//! #[tokio::test]
//! async fn my_client_test() {
//!     let upstream = spawn_upstream(Router::new().route("/", get(|| async { "ok" }))).await;
//!     let base_url = upstream.base_url();
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongodb")]
mod mongo;
mod upstream;

#[cfg(feature = "mongodb")]
pub use mongo::TestMongo;
pub use upstream::{TestUpstream, spawn_upstream, unreachable_base_url};

/// Builder for test data with deterministic randomization
///
/// This keeps tests reproducible by deriving everything from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_calendar");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic id, distinct per `label`
    pub fn id(&self, label: &str) -> Uuid {
        let seed = Self::from_test_name(&format!("{}-{}", self.seed, label)).seed;
        let bytes = seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&self.seed.to_le_bytes());
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("calendar", "main");
    /// assert!(name.starts_with("test-calendar-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A unique, syntactically valid email address
    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@kalendas.test", local, self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that two id sets match regardless of order
    pub fn assert_same_ids(actual: &[Uuid], expected: &[Uuid], context: &str) {
        let mut actual = actual.to_vec();
        let mut expected = expected.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected, "{}: id sets differ", context);
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.id("calendar"), builder2.id("calendar"));
        assert_eq!(
            builder1.name("calendar", "test"),
            builder2.name("calendar", "test")
        );
    }

    #[test]
    fn test_ids_differ_by_label() {
        let builder = TestDataBuilder::from_test_name("my_test");
        assert_ne!(builder.id("parent"), builder.id("child"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.id("x"), builder2.id("x"));
        assert_ne!(builder1.email("org"), builder2.email("org"));
    }

    #[test]
    fn test_assert_same_ids_ignores_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assertions::assert_same_ids(&[a, b], &[b, a], "order");
    }

    #[tokio::test]
    async fn test_spawn_upstream_serves_router() {
        use axum::routing::get;

        let upstream =
            spawn_upstream(axum::Router::new().route("/ping", get(|| async { "pong" }))).await;
        let mut stream = tokio::net::TcpStream::connect(upstream.addr()).await.unwrap();

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("pong"));
    }
}
