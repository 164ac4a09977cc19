//! Request body rewriting applied before handlers run
//!
//! * [`unwrap_cloud_events`] replaces a cloud event body with its `data`.
//! * [`decode_form_to_json`] turns form-encoded bodies on a path prefix into a
//!   JSON object, so JSON handlers can accept form posts from webhooks.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use sidecar::{unwrap_cloud_event, CLOUD_EVENT_CONTENT_TYPE};

/// Largest body the rewriting middleware will buffer
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

fn rebuild_request(mut parts: Parts, content_type: &str, body: Vec<u8>) -> Request {
    parts.headers.remove(CONTENT_LENGTH);
    match HeaderValue::from_str(content_type) {
        Ok(value) => {
            parts.headers.insert(CONTENT_TYPE, value);
        }
        Err(_) => {
            parts.headers.remove(CONTENT_TYPE);
        }
    }
    Request::from_parts(parts, Body::from(body))
}

/// Replace `application/cloudevents+json` bodies with the event payload
pub async fn unwrap_cloud_events(request: Request, next: Next) -> Response {
    if !content_type_is(request.headers(), CLOUD_EVENT_CONTENT_TYPE) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read cloud event body: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match unwrap_cloud_event(&bytes) {
        Ok((payload, content_type)) => {
            debug!("Unwrapped cloud event for {}", parts.uri.path());
            next.run(rebuild_request(parts, &content_type, payload)).await
        }
        Err(e) => {
            warn!("Malformed cloud event: {}", e);
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// Whether `path` falls under `/prefix`, ignoring case
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    let path = path.trim_start_matches('/');
    let prefix = prefix.trim_start_matches('/');
    !prefix.is_empty()
        && path.len() >= prefix.len()
        && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Convert a form-encoded body into a JSON object of strings
///
/// Repeated keys keep the last value.
pub fn form_to_json(form: &[u8]) -> Value {
    let map: Map<String, Value> = url::form_urlencoded::parse(form)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect();
    Value::Object(map)
}

/// Rewrite form posts under the configured path prefix as JSON
pub async fn decode_form_to_json(
    State(prefix): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    if !matches_prefix(request.uri().path(), &prefix)
        || !content_type_is(request.headers(), FORM_CONTENT_TYPE)
    {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read form body: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let json = form_to_json(&bytes).to_string().into_bytes();
    next.run(rebuild_request(parts, "application/json", json)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_matches_prefix() {
        assert!(matches_prefix("/twiliopostinjson", "TwilioPost"));
        assert!(matches_prefix("/TwilioPost", "/TwilioPost"));
        assert!(!matches_prefix("/deposit", "TwilioPost"));
        assert!(!matches_prefix("/twilio", "TwilioPost"));
        assert!(!matches_prefix("/anything", ""));
    }

    #[test]
    fn test_form_to_json() {
        assert_eq!(
            form_to_json(b"CallSid=CA123&To=%2B15551234567&Empty="),
            json!({ "CallSid": "CA123", "To": "+15551234567", "Empty": "" })
        );
        assert_eq!(form_to_json(b""), json!({}));
    }

    #[test]
    fn test_content_type_ignores_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
        );
        assert!(content_type_is(&headers, FORM_CONTENT_TYPE));
        assert!(!content_type_is(&headers, CLOUD_EVENT_CONTENT_TYPE));
    }
}
