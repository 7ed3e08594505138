//! Bearer-token verification for external API clients.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let claims = auth.verify_headers(request.headers())?;
//! ```

pub mod config;
pub mod jwt;

pub use config::JwtConfig;
pub use jwt::{AuthError, JwtAuth, JwtClaims, bearer_token};
