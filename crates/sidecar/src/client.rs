use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SidecarConfig;
use crate::error::{SidecarError, SidecarResult};

/// Header carrying the sidecar API token
pub const API_TOKEN_HEADER: &str = "dapr-api-token";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Error body the sidecar returns for failed calls
#[derive(Debug, Deserialize)]
struct SidecarErrorBody {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
    message: Option<String>,
}

/// Actor timer or reminder registration body
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScheduleBody {
    pub due_time: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Kind of actor schedule, selects the URL segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScheduleKind {
    Timer,
    Reminder,
}

impl ScheduleKind {
    fn segment(self) -> &'static str {
        match self {
            ScheduleKind::Timer => "timers",
            ScheduleKind::Reminder => "reminders",
        }
    }
}

/// Typed client for the sidecar HTTP API
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SidecarClient {
    http: reqwest::Client,
    config: Arc<SidecarConfig>,
}

impl SidecarClient {
    pub fn new(config: SidecarConfig) -> SidecarResult<Self> {
        if !config.http_endpoint.starts_with("http://") && !config.http_endpoint.starts_with("https://") {
            return Err(SidecarError::InvalidConfig(format!(
                "http endpoint must be an http(s) URL: {}",
                config.http_endpoint
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SidecarConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1.0/{}", self.config.http_endpoint, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.config.api_token {
            Some(token) => builder.header(API_TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn send(&self, operation: &str, builder: RequestBuilder) -> SidecarResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} -> {}", operation, status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SidecarError::unexpected_status(operation, status.as_u16(), body))
        }
    }

    /// Check that the sidecar is up
    pub async fn healthz(&self) -> SidecarResult<()> {
        self.send("healthz", self.request(Method::GET, "healthz"))
            .await
            .map(|_| ())
    }

    /// Fetch a value from a state store; `None` when the key is absent
    pub async fn get_state<T: DeserializeOwned>(
        &self,
        store: &str,
        key: &str,
    ) -> SidecarResult<Option<T>> {
        let operation = format!("get state {}/{}", store, key);
        let response = self
            .send(&operation, self.request(Method::GET, &format!("state/{}/{}", store, key)))
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Save a single key into a state store
    pub async fn save_state<T: Serialize>(
        &self,
        store: &str,
        key: &str,
        value: &T,
    ) -> SidecarResult<()> {
        let body = json!([{ "key": key, "value": value }]);
        let operation = format!("save state {}/{}", store, key);
        self.send(
            &operation,
            self.request(Method::POST, &format!("state/{}", store)).json(&body),
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_state(&self, store: &str, key: &str) -> SidecarResult<()> {
        let operation = format!("delete state {}/{}", store, key);
        self.send(
            &operation,
            self.request(Method::DELETE, &format!("state/{}/{}", store, key)),
        )
        .await
        .map(|_| ())
    }

    /// Publish an event to a topic
    pub async fn publish_event<T: Serialize>(
        &self,
        pubsub: &str,
        topic: &str,
        data: &T,
    ) -> SidecarResult<()> {
        let operation = format!("publish {}/{}", pubsub, topic);
        self.send(
            &operation,
            self.request(Method::POST, &format!("publish/{}/{}", pubsub, topic))
                .json(data),
        )
        .await
        .map(|_| ())
    }

    /// Invoke an actor method and return the raw response body
    ///
    /// A 500 reply means the method failed inside the actor and is reported as
    /// [`SidecarError::ActorMethodInvocation`].
    pub async fn invoke_actor_method(
        &self,
        actor_type: &str,
        actor_id: &str,
        method: &str,
        body: Option<Vec<u8>>,
        content_type: &str,
    ) -> SidecarResult<Vec<u8>> {
        let path = format!("actors/{}/{}/method/{}", actor_type, actor_id, method);
        let mut builder = self.request(Method::POST, &path);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("invoke {}/{}/{} -> {}", actor_type, actor_id, method, status);

        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let (error_code, message) = match serde_json::from_str::<SidecarErrorBody>(&text) {
                Ok(parsed) => (parsed.error_code, parsed.message.unwrap_or(text)),
                Err(_) => (None, text),
            };
            warn!(
                "Actor method {}/{}/{} failed: {}",
                actor_type, actor_id, method, message
            );
            return Err(SidecarError::ActorMethodInvocation {
                actor_type: actor_type.to_string(),
                actor_id: actor_id.to_string(),
                method: method.to_string(),
                error_code,
                message,
            });
        }

        Err(SidecarError::unexpected_status(
            format!("invoke {}/{}/{}", actor_type, actor_id, method),
            status.as_u16(),
            text,
        ))
    }

    /// Invoke an actor method with a JSON body
    pub async fn invoke_actor_method_json<T: Serialize>(
        &self,
        actor_type: &str,
        actor_id: &str,
        method: &str,
        payload: &T,
    ) -> SidecarResult<Vec<u8>> {
        let body = serde_json::to_vec(payload)?;
        self.invoke_actor_method(actor_type, actor_id, method, Some(body), JSON_CONTENT_TYPE)
            .await
    }

    pub(crate) async fn register_actor_schedule(
        &self,
        kind: ScheduleKind,
        actor_type: &str,
        actor_id: &str,
        name: &str,
        body: &ScheduleBody,
    ) -> SidecarResult<()> {
        let path = format!("actors/{}/{}/{}/{}", actor_type, actor_id, kind.segment(), name);
        self.send(&format!("register {}", path), self.request(Method::POST, &path).json(body))
            .await
            .map(|_| ())
    }

    pub(crate) async fn unregister_actor_schedule(
        &self,
        kind: ScheduleKind,
        actor_type: &str,
        actor_id: &str,
        name: &str,
    ) -> SidecarResult<()> {
        let path = format!("actors/{}/{}/{}/{}", actor_type, actor_id, kind.segment(), name);
        self.send(&format!("unregister {}", path), self.request(Method::DELETE, &path))
            .await
            .map(|_| ())
    }

    /// POST a raw body to an arbitrary URL, failing on a non-success status
    ///
    /// Used to call the application directly rather than through the sidecar.
    pub async fn post_to_app(
        &self,
        url: &str,
        body: impl Into<reqwest::Body>,
        content_type: &str,
    ) -> SidecarResult<()> {
        self.send(
            &format!("POST {}", url),
            self.http
                .post(url)
                .header(CONTENT_TYPE, content_type)
                .body(body),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = SidecarConfig::default().with_endpoint("localhost:3500");
        assert!(matches!(
            SidecarClient::new(config),
            Err(SidecarError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_url_building() {
        let client = SidecarClient::new(SidecarConfig::default()).unwrap();
        assert_eq!(
            client.url("state/statestore/abc"),
            "http://127.0.0.1:3500/v1.0/state/statestore/abc"
        );
    }

    #[test]
    fn test_schedule_body_omits_empty_fields() {
        let body = ScheduleBody {
            due_time: "0h0m5s0ms".to_string(),
            period: "0h0m1s0ms".to_string(),
            callback: None,
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "dueTime": "0h0m5s0ms", "period": "0h0m1s0ms" })
        );
    }
}
