//! HTTP-level helpers: CORS, security headers and forwarded identity.

pub mod cors;
pub mod identity;
pub mod security;

pub use cors::{cors_layer_from_env, create_cors_layer};
pub use identity::{
    ANONYMOUS_AUTHOR, USER_EMAIL_HEADER, USER_NAME_HEADER, author_from_headers, header_safe_name,
    name_header_value, strip_diacritics,
};
pub use security::security_headers;
