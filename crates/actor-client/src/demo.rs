use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{error, info, warn};

use sidecar::{
    ActorId, ActorProxy, DemoActor, DemoActorProxy, MyData, SidecarClient, SidecarError,
    SidecarResult, DEMO_ACTOR_TYPE,
};

use crate::args::ClientArgs;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_PAYLOAD: &str = r#"{"PropertyA":"ValueA","PropertyB":"ValueB"}"#;
const FORM_PAYLOAD: &str = "PropertyA=ValueA&PropertyB=ValueB";

/// What the demo run needs from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSettings {
    pub app_url: String,
    pub actor_id: String,
    pub raw_actor_id: String,
    pub wait: Duration,
}

impl From<&ClientArgs> for DemoSettings {
    fn from(args: &ClientArgs) -> Self {
        Self {
            app_url: args.app_url.trim_end_matches('/').to_string(),
            actor_id: args.actor_id.clone(),
            raw_actor_id: args.raw_actor_id.clone(),
            wait: Duration::from_secs(args.wait_secs),
        }
    }
}

/// How the always-failing actor method behaved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowCheck {
    /// Failed inside the actor with a not-implemented error
    Correct,
    /// Failed some other way, or did not fail
    Incorrect,
}

pub fn check_throw_result(result: &SidecarResult<()>) -> ThrowCheck {
    match result {
        Err(err @ SidecarError::ActorMethodInvocation { .. }) if err.is_not_implemented() => {
            ThrowCheck::Correct
        }
        _ => ThrowCheck::Incorrect,
    }
}

/// Run the full call sequence against the demo actor
pub async fn run(client: SidecarClient, settings: &DemoSettings) -> Result<()> {
    let data = MyData::new("ValueA", "ValueB");

    let proxy = DemoActorProxy::new(client.clone(), ActorId::from(settings.actor_id.as_str()));

    info!("Making call using actor proxy to save data.");
    proxy.save_data(data.clone()).await.context("SaveData via proxy")?;
    info!("Making call using actor proxy to get data.");
    let received = proxy.get_data().await.context("GetData via proxy")?;
    info!("Received data is {}.", received);

    raw_http_calls(&client, settings).await?;

    info!("Making calls to an actor method which has no argument and no return type.");
    if let Err(e) = proxy.test_no_argument_no_return_type().await {
        error!(
            "Got exception while making call to method with No Argument & No Return Type: {}",
            e
        );
    }

    let result = proxy.test_throw_exception().await;
    match check_throw_result(&result) {
        ThrowCheck::Correct => info!("Got Correct Exception from actor method invocation."),
        ThrowCheck::Incorrect => warn!(
            "Got Incorrect Exception from actor method invocation: {:?}",
            result.err()
        ),
    }

    info!("Making calls without typed proxy.");
    let untyped = ActorProxy::new(
        client,
        ActorId::from(settings.actor_id.as_str()),
        DEMO_ACTOR_TYPE,
    );
    untyped.invoke("TestNoArgumentNoReturnType").await?;
    untyped.invoke_with("SaveData", &data).await?;
    let untyped_data: MyData = untyped.invoke_for("GetData").await?;
    info!("Received data without typed proxy is {}.", untyped_data);

    info!("Registering the timer and reminder");
    proxy.register_timer().await.context("RegisterTimer")?;
    proxy.register_reminder().await.context("RegisterReminder")?;
    info!("Waiting {:?} so the timer and reminder can be triggered", settings.wait);
    tokio::time::sleep(settings.wait).await;

    info!("Making call using actor proxy to get data after timer and reminder triggered");
    let received = proxy.get_data().await.context("GetData after timers")?;
    info!("Received data is {}.", received);

    info!("Deregistering timer. Timers stop anyway once the actor is deactivated.");
    proxy.unregister_timer().await.context("UnregisterTimer")?;
    info!("Deregistering reminder. Reminders are durable and only stop when removed or the actor is deleted.");
    proxy.unregister_reminder().await.context("UnregisterReminder")?;

    Ok(())
}

/// The same calls made without a proxy: app middleware check, then JSON and form bodies
async fn raw_http_calls(client: &SidecarClient, settings: &DemoSettings) -> Result<()> {
    let app_endpoint = format!("{}/AppPortEndPoint", settings.app_url);
    info!("Checking app middleware at {}", app_endpoint);
    client
        .post_to_app(&app_endpoint, "", FORM_CONTENT_TYPE)
        .await
        .context("App endpoint call")?;

    info!("Saving data with a raw JSON call");
    client
        .invoke_actor_method(
            DEMO_ACTOR_TYPE,
            &settings.raw_actor_id,
            "SaveData",
            Some(JSON_PAYLOAD.as_bytes().to_vec()),
            "application/json",
        )
        .await
        .context("Raw JSON SaveData")?;

    info!("Saving data with a raw form-encoded call");
    client
        .invoke_actor_method(
            DEMO_ACTOR_TYPE,
            &settings.raw_actor_id,
            "SaveData",
            Some(FORM_PAYLOAD.as_bytes().to_vec()),
            FORM_CONTENT_TYPE,
        )
        .await
        .context("Raw form SaveData")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sidecar::SidecarConfig;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Fake sidecar and app: records `(path, content type)` per call
    #[derive(Clone, Default)]
    struct FakeHost {
        calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
        actor_state: Arc<Mutex<HashMap<String, Bytes>>>,
        fail_no_argument_method: bool,
    }

    impl FakeHost {
        async fn record(&self, path: String, headers: &HeaderMap) {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            self.calls.lock().await.push((path, content_type));
        }

        async fn paths(&self) -> Vec<String> {
            self.calls.lock().await.iter().map(|(path, _)| path.clone()).collect()
        }
    }

    async fn app_endpoint(State(host): State<FakeHost>, headers: HeaderMap) -> StatusCode {
        host.record("/AppPortEndPoint".to_string(), &headers).await;
        StatusCode::OK
    }

    async fn actor_method(
        State(host): State<FakeHost>,
        Path((actor_type, actor_id, method)): Path<(String, String, String)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let key = format!("{}/{}", actor_type, actor_id);
        host.record(format!("{}/{}", key, method), &headers).await;

        match method.as_str() {
            "SaveData" => {
                host.actor_state.lock().await.insert(key, body);
                StatusCode::OK.into_response()
            }
            "GetData" => match host.actor_state.lock().await.get(&key) {
                Some(data) => ([("content-type", "application/json")], data.clone()).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            },
            "TestThrowException" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "errorCode": "ERR_ACTOR_INVOKE_METHOD",
                    "message": "NotImplementedException: The method or operation is not implemented."
                })),
            )
                .into_response(),
            "TestNoArgumentNoReturnType" if host.fail_no_argument_method => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "errorCode": "ERR_ACTOR_INVOKE_METHOD", "message": "boom" })),
            )
                .into_response(),
            _ => StatusCode::OK.into_response(),
        }
    }

    async fn start_fake_host(host: FakeHost) -> String {
        let app = Router::new()
            .route("/AppPortEndPoint", post(app_endpoint))
            .route(
                "/v1.0/actors/{actor_type}/{actor_id}/method/{method}",
                post(actor_method),
            )
            .with_state(host);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", address)
    }

    fn settings_for(endpoint: &str) -> DemoSettings {
        DemoSettings {
            app_url: endpoint.to_string(),
            actor_id: "abc".to_string(),
            raw_actor_id: "123".to_string(),
            wait: Duration::ZERO,
        }
    }

    fn client_for(endpoint: &str) -> SidecarClient {
        SidecarClient::new(SidecarConfig::default().with_endpoint(endpoint)).unwrap()
    }

    fn invocation_error(message: &str) -> SidecarError {
        SidecarError::ActorMethodInvocation {
            actor_type: DEMO_ACTOR_TYPE.to_string(),
            actor_id: "abc".to_string(),
            method: "TestThrowException".to_string(),
            error_code: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_throw_check() {
        assert_eq!(
            check_throw_result(&Err(invocation_error("NotImplementedException"))),
            ThrowCheck::Correct
        );
        assert_eq!(
            check_throw_result(&Err(invocation_error("ArgumentException"))),
            ThrowCheck::Incorrect
        );
        assert_eq!(check_throw_result(&Ok(())), ThrowCheck::Incorrect);
    }

    #[test]
    fn test_raw_payloads_describe_the_same_data() {
        let data: MyData = serde_json::from_str(JSON_PAYLOAD).unwrap();
        assert_eq!(data, MyData::new("ValueA", "ValueB"));
    }

    #[test]
    fn test_settings_from_args() {
        let args = ClientArgs::parse_from([
            "actor-client",
            "--app-url",
            "http://localhost:5001/",
            "--wait-secs",
            "2",
        ]);
        let settings = DemoSettings::from(&args);
        assert_eq!(settings.app_url, "http://localhost:5001");
        assert_eq!(settings.actor_id, "abc");
        assert_eq!(settings.raw_actor_id, "123");
        assert_eq!(settings.wait, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_run_makes_calls_in_order() {
        let host = FakeHost::default();
        let endpoint = start_fake_host(host.clone()).await;

        run(client_for(&endpoint), &settings_for(&endpoint))
            .await
            .unwrap();

        assert_eq!(
            host.paths().await,
            vec![
                "DemoActor/abc/SaveData",
                "DemoActor/abc/GetData",
                "/AppPortEndPoint",
                "DemoActor/123/SaveData",
                "DemoActor/123/SaveData",
                "DemoActor/abc/TestNoArgumentNoReturnType",
                "DemoActor/abc/TestThrowException",
                "DemoActor/abc/TestNoArgumentNoReturnType",
                "DemoActor/abc/SaveData",
                "DemoActor/abc/GetData",
                "DemoActor/abc/RegisterTimer",
                "DemoActor/abc/RegisterReminder",
                "DemoActor/abc/GetData",
                "DemoActor/abc/UnregisterTimer",
                "DemoActor/abc/UnregisterReminder",
            ]
        );

        let calls = host.calls.lock().await;
        assert_eq!(calls[2].1.as_deref(), Some(FORM_CONTENT_TYPE));
        assert_eq!(calls[3].1.as_deref(), Some("application/json"));
        assert_eq!(calls[4].1.as_deref(), Some(FORM_CONTENT_TYPE));

        // The raw form body is the last thing saved for the raw actor
        let state = host.actor_state.lock().await;
        assert_eq!(state["DemoActor/123"], Bytes::from_static(FORM_PAYLOAD.as_bytes()));
    }

    #[tokio::test]
    async fn test_untyped_failure_aborts_run() {
        let host = FakeHost {
            fail_no_argument_method: true,
            ..FakeHost::default()
        };
        let endpoint = start_fake_host(host.clone()).await;

        let result = run(client_for(&endpoint), &settings_for(&endpoint)).await;
        assert!(result.is_err());

        // The typed call failing is only logged; the untyped one stops the run
        let paths = host.paths().await;
        assert_eq!(
            paths.iter().filter(|p| p.ends_with("TestNoArgumentNoReturnType")).count(),
            2
        );
        assert_eq!(
            paths.last().map(String::as_str),
            Some("DemoActor/abc/TestNoArgumentNoReturnType")
        );
        assert!(!paths.iter().any(|p| p.ends_with("RegisterTimer")));
    }
}
