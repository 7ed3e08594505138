use super::config::JwtConfig;
use crate::errors::AppError;
use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by an external client's bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header must use the Bearer scheme")]
    InvalidScheme,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// HS256 token issuer and verifier sharing one secret.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token valid for `ttl_seconds` from now.
    pub fn create_token(
        &self,
        subject: &str,
        email: &str,
        name: &str,
        roles: &[String],
        ttl_seconds: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check signature, algorithm and expiry, then return the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    /// Extract and verify the bearer token from request headers.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<JwtClaims, AuthError> {
        self.verify_token(bearer_token(headers)?)
    }
}

/// Return the raw token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidScheme);
    }

    Ok(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "kalendas-test-secret-with-at-least-32-chars";

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_create_and_verify_round_trip() {
        let auth = auth();
        let token = auth
            .create_token("u-1", "ana@example.com", "Ana", &["user".to_string()], 300)
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = auth();
        let token = auth
            .create_token("u-1", "ana@example.com", "Ana", &[], -3600)
            .unwrap();

        assert_eq!(auth.verify_token(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-also-32-chars-long").unwrap());
        let token = other
            .create_token("u-1", "ana@example.com", "Ana", &[], 300)
            .unwrap();

        assert!(matches!(auth().verify_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            auth().verify_token("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Ok("abc"));
        assert_eq!(
            bearer_token(&headers_with("Basic abc")),
            Err(AuthError::InvalidScheme)
        );
        assert_eq!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidScheme)
        );
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_verify_headers() {
        let auth = auth();
        let token = auth
            .create_token("u-2", "luis@example.com", "Luis", &[], 300)
            .unwrap();

        let claims = auth
            .verify_headers(&headers_with(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(claims.name, "Luis");
    }
}
