//! Caller identity forwarded between services as plain headers.
//!
//! The gateway sets these for verified external clients; the frontend sets them
//! for its own users. Values must be ASCII-safe, so display names are folded
//! with [`strip_diacritics`] before they are written.

use axum::http::{HeaderMap, HeaderValue};
use icu::normalizer::DecomposingNormalizerBorrowed;
use icu::properties::{CodePointMapData, props::GeneralCategory};

pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Display name used when a request carries no usable author header
pub const ANONYMOUS_AUTHOR: &str = "Anonimo";

/// Remove combining marks after canonical decomposition.
///
/// `"José Muñoz"` becomes `"Jose Munoz"`. Characters without a decomposition are
/// kept as they are.
pub fn strip_diacritics(input: &str) -> String {
    let nfd = DecomposingNormalizerBorrowed::new_nfd();
    let categories = CodePointMapData::<GeneralCategory>::new();

    nfd.normalize(input)
        .chars()
        .filter(|c| {
            !matches!(
                categories.get(*c),
                GeneralCategory::NonspacingMark
                    | GeneralCategory::SpacingMark
                    | GeneralCategory::EnclosingMark
            )
        })
        .collect()
}

/// Fold a display name into a value that is always a valid header.
///
/// Marks are stripped, then anything outside printable ASCII is dropped.
pub fn header_safe_name(name: &str) -> String {
    strip_diacritics(name)
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build a header value from a display name, or `None` if nothing printable remains.
pub fn name_header_value(name: &str) -> Option<HeaderValue> {
    let safe = header_safe_name(name);
    if safe.is_empty() {
        return None;
    }
    HeaderValue::from_str(&safe).ok()
}

/// Author display name from `x-user-name`, decoded leniently.
///
/// Falls back to [`ANONYMOUS_AUTHOR`] when the header is absent or blank.
pub fn author_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(USER_NAME_HEADER)
        .map(|value| strip_diacritics(&String::from_utf8_lossy(value.as_bytes())))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
}
