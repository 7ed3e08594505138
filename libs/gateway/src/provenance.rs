//! Who is calling: the Kalendas frontend, or an external API client.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum_helpers::http::identity::name_header_value;
use axum_helpers::{AuthError, JwtAuth, JwtClaims, USER_EMAIL_HEADER, USER_NAME_HEADER};

pub const DEFAULT_INTERNAL_HEADER: &str = "x-internal-frontend";

/// Decided once per request, before anything is forwarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestProvenance {
    /// Marked by the frontend; no token check
    Internal,
    /// Carried a valid bearer token
    External(JwtClaims),
}

impl RequestProvenance {
    /// Rewrite the identity headers for external callers.
    ///
    /// Caller-supplied `x-user-email`/`x-user-name` are dropped and replaced with
    /// the verified claims. Internal requests are left untouched.
    pub fn apply_identity(&self, headers: &mut HeaderMap) {
        let RequestProvenance::External(claims) = self else {
            return;
        };

        headers.remove(USER_EMAIL_HEADER);
        headers.remove(USER_NAME_HEADER);

        if let Ok(email) = HeaderValue::from_str(&claims.email) {
            headers.insert(USER_EMAIL_HEADER, email);
        }
        if let Some(name) = name_header_value(&claims.name) {
            headers.insert(USER_NAME_HEADER, name);
        }
    }
}

/// Marker header plus bearer-token verifier
#[derive(Clone)]
pub struct AuthPolicy {
    marker: HeaderName,
    marker_token: Option<String>,
    jwt: JwtAuth,
}

impl AuthPolicy {
    pub fn new(marker: HeaderName, marker_token: Option<String>, jwt: JwtAuth) -> Self {
        Self {
            marker,
            marker_token,
            jwt,
        }
    }

    /// Internal when the marker is present (and matches the pinned token, if
    /// any). Otherwise the bearer token must verify.
    pub fn classify(&self, headers: &HeaderMap) -> Result<RequestProvenance, AuthError> {
        if self.is_internal(headers) {
            return Ok(RequestProvenance::Internal);
        }
        self.jwt
            .verify_headers(headers)
            .map(RequestProvenance::External)
    }

    fn is_internal(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers.get(&self.marker) else {
            return false;
        };
        match &self.marker_token {
            Some(expected) => value.as_bytes() == expected.as_bytes(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::JwtConfig;

    const SECRET: &str = "gateway-test-secret-with-32-characters!";

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
    }

    fn policy(token: Option<&str>) -> AuthPolicy {
        AuthPolicy::new(
            HeaderName::from_static(DEFAULT_INTERNAL_HEADER),
            token.map(str::to_string),
            jwt(),
        )
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_marker_presence_is_internal() {
        let provenance = policy(None)
            .classify(&headers(&[(DEFAULT_INTERNAL_HEADER, "1")]))
            .unwrap();
        assert_eq!(provenance, RequestProvenance::Internal);
    }

    #[test]
    fn test_pinned_marker_must_match() {
        let policy = policy(Some("s3cret"));
        assert_eq!(
            policy.classify(&headers(&[(DEFAULT_INTERNAL_HEADER, "s3cret")])),
            Ok(RequestProvenance::Internal)
        );
        assert_eq!(
            policy.classify(&headers(&[(DEFAULT_INTERNAL_HEADER, "guess")])),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_bearer_token_is_external() {
        let token = jwt()
            .create_token("u-1", "ana@example.com", "Ana", &[], 300)
            .unwrap();
        let provenance = policy(None)
            .classify(&headers(&[("authorization", &format!("Bearer {token}"))]))
            .unwrap();

        match provenance {
            RequestProvenance::External(claims) => assert_eq!(claims.email, "ana@example.com"),
            other => panic!("expected external, got {other:?}"),
        }
    }

    #[test]
    fn test_rejections() {
        let policy = policy(None);
        assert_eq!(policy.classify(&HeaderMap::new()), Err(AuthError::MissingCredentials));
        assert_eq!(
            policy.classify(&headers(&[("authorization", "Basic abc")])),
            Err(AuthError::InvalidScheme)
        );

        let expired = jwt()
            .create_token("u-1", "ana@example.com", "Ana", &[], -3600)
            .unwrap();
        assert_eq!(
            policy.classify(&headers(&[("authorization", &format!("Bearer {expired}"))])),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_external_identity_replaces_caller_headers() {
        let token = jwt()
            .create_token("u-1", "jose@example.com", "José Muñoz", &[], 300)
            .unwrap();
        let claims = jwt().verify_token(&token).unwrap();

        let mut forwarded = headers(&[
            (USER_EMAIL_HEADER, "spoof@example.com"),
            (USER_NAME_HEADER, "Spoofer"),
            ("authorization", "Bearer x"),
        ]);
        RequestProvenance::External(claims).apply_identity(&mut forwarded);

        assert_eq!(forwarded[USER_EMAIL_HEADER], "jose@example.com");
        assert_eq!(forwarded[USER_NAME_HEADER], "Jose Munoz");
    }

    #[test]
    fn test_internal_identity_passes_through() {
        let mut forwarded = headers(&[(USER_NAME_HEADER, "Ana")]);
        RequestProvenance::Internal.apply_identity(&mut forwarded);
        assert_eq!(forwarded[USER_NAME_HEADER], "Ana");
    }
}
