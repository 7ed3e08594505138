//! Kalendas API gateway
//!
//! Maps `/{service}/{rest}` onto the configured base URL of that service and
//! relays the answer untouched.
//!
//! Per request, in order, stopping at the first failure:
//!
//! 1. resolve the service (404)
//! 2. check the method against the service's allowed set (405)
//! 3. classify provenance: internal frontend marker, or a valid bearer token (401)
//! 4. forward once, with no retry (500 on transport failure)

pub mod config;
pub mod error;
pub mod handlers;
pub mod provenance;
pub mod proxy;
pub mod registry;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use handlers::{ApiDoc, GatewayState, router};
pub use provenance::{AuthPolicy, RequestProvenance};
pub use proxy::{ForwardRequest, Proxy};
pub use registry::{ServiceEntry, ServiceRegistry};

