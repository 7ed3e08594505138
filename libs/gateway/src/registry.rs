//! Which services the gateway knows and how to reach them.

use axum::http::Method;
use core_config::{ConfigError, FromEnv, env_or_default};

const FULL_ACCESS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// One proxied service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEntry {
    pub name: String,
    pub base_url: String,
    pub methods: Vec<Method>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, methods: &[Method]) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            methods: methods.to_vec(),
        }
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// `base_url` + `/` + `rest`, with `?query` appended when present.
    ///
    /// `rest` is used verbatim so a trailing slash survives.
    pub fn upstream_url(&self, rest: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}/{}?{}", self.base_url, rest, query),
            _ => format!("{}/{}", self.base_url, rest),
        }
    }
}

/// Fixed set of services reachable through the gateway
#[derive(Clone, Debug, Default)]
pub struct ServiceRegistry {
    entries: Vec<ServiceEntry>,
}

impl ServiceRegistry {
    pub fn new(entries: Vec<ServiceEntry>) -> Self {
        Self { entries }
    }

    /// The Kalendas services at the given base URLs. `external` only accepts POST.
    pub fn kalendas(calendar: &str, event: &str, comment: &str, external: &str) -> Self {
        Self::new(vec![
            ServiceEntry::new("calendar", calendar, &FULL_ACCESS),
            ServiceEntry::new("event", event, &FULL_ACCESS),
            ServiceEntry::new("comment", comment, &FULL_ACCESS),
            ServiceEntry::new("external", external, &[Method::POST]),
        ])
    }

    pub fn resolve(&self, name: &str) -> Option<&ServiceEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }
}

impl FromEnv for ServiceRegistry {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::kalendas(
            &env_or_default("CALENDAR_SERVICE_URL", "http://calendar_service:8000"),
            &env_or_default("EVENT_SERVICE_URL", "http://event_service:8000"),
            &env_or_default("COMMENT_SERVICE_URL", "http://comment_service:8000"),
            &env_or_default("EXTERNAL_SERVICE_URL", "http://external_service:8000"),
        ))
    }
}
