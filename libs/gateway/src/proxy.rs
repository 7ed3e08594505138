//! Single-attempt HTTP forwarding to a registered service.

use axum::{
    body::{Body, Bytes},
    http::{
        HeaderMap, Method,
        header::{CONNECTION, CONTENT_LENGTH, HOST, HeaderName, TRANSFER_ENCODING},
    },
    response::Response,
};
use std::time::Duration;
use tracing::instrument;

use crate::error::{GatewayError, GatewayResult};
use crate::registry::ServiceEntry;

/// Never copied onto the upstream request
const REQUEST_HOP_HEADERS: [HeaderName; 4] = [HOST, CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION];

/// Never copied back to the caller; the body is re-framed locally
const RESPONSE_HOP_HEADERS: [HeaderName; 3] = [CONNECTION, TRANSFER_ENCODING, CONTENT_LENGTH];

/// A request already stripped of its `/{service}` prefix
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path after `/{service}/`, verbatim
    pub rest: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    without(headers, &REQUEST_HOP_HEADERS)
}

pub fn returnable_headers(headers: &HeaderMap) -> HeaderMap {
    without(headers, &RESPONSE_HOP_HEADERS)
}

fn without(headers: &HeaderMap, excluded: &[HeaderName]) -> HeaderMap {
    let mut kept = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !excluded.contains(name) {
            kept.append(name.clone(), value.clone());
        }
    }
    kept
}

#[derive(Clone)]
pub struct Proxy {
    client: reqwest::Client,
}

impl Proxy {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Forward once and relay status, headers and body unchanged.
    #[instrument(skip(self, entry, request), fields(service = %entry.name, method = %request.method, rest = %request.rest))]
    pub async fn forward(
        &self,
        entry: &ServiceEntry,
        request: ForwardRequest,
    ) -> GatewayResult<Response> {
        let url = entry.upstream_url(&request.rest, request.query.as_deref());
        let transport = |e: reqwest::Error| GatewayError::Upstream {
            service: entry.name.clone(),
            message: e.to_string(),
        };

        let upstream = self
            .client
            .request(request.method, &url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(transport)?;

        let status = upstream.status();
        let headers = returnable_headers(upstream.headers());
        let body = upstream.bytes().await.map_err(transport)?;
        tracing::debug!(status = %status, bytes = body.len(), "Upstream responded");

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("gateway:8000"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("x-user-name", HeaderValue::from_static("Ana"));
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));

        let kept = forwardable_headers(&headers);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept["x-user-name"], "Ana");
        assert_eq!(kept.get_all("accept").iter().count(), 2);
    }

    #[test]
    fn test_response_keeps_host_like_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert("location", HeaderValue::from_static("/events/1"));

        let kept = returnable_headers(&headers);
        assert!(kept.get(CONTENT_LENGTH).is_none());
        assert_eq!(kept["location"], "/events/1");
    }
}
