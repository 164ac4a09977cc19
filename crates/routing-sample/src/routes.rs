use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::RoutingConfig;
use crate::error::ApiError;
use crate::middleware::{decode_form_to_json, unwrap_cloud_events};
use crate::models::{Account, Transaction, VoiceRequest};
use crate::store::StateStore;
use crate::twiml::VoiceResponse;

/// Path the sidecar queries for topic subscriptions
pub const SUBSCRIBE_PATH: &str = "/dapr/subscribe";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub pause_length: u32,
}

/// One topic-to-route binding reported to the sidecar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: String,
    pub route: String,
}

/// Collects routes and remembers which ones are bound to a topic
struct TopicRouter {
    router: Router<AppState>,
    pubsub_name: String,
    subscriptions: Vec<Subscription>,
}

impl TopicRouter {
    fn new(pubsub_name: &str) -> Self {
        Self {
            router: Router::new(),
            pubsub_name: pubsub_name.to_string(),
            subscriptions: Vec::new(),
        }
    }

    fn route(mut self, path: &str, handler: MethodRouter<AppState>) -> Self {
        self.router = self.router.route(path, handler);
        self
    }

    /// Route `path` and subscribe it to `topic`
    fn topic(mut self, path: &str, topic: &str, handler: MethodRouter<AppState>) -> Self {
        self.subscriptions.push(Subscription {
            pubsubname: self.pubsub_name.clone(),
            topic: topic.to_string(),
            route: path.trim_start_matches('/').to_string(),
        });
        self.route(path, handler)
    }

    /// Finish with the subscribe handler listing every topic route
    fn into_router(self) -> Router<AppState> {
        let subscriptions = Arc::new(self.subscriptions);
        self.router.route(
            SUBSCRIBE_PATH,
            get(move || {
                let subscriptions = subscriptions.clone();
                async move { Json(subscriptions.as_ref().clone()) }
            }),
        )
    }
}

/// Build the service router
pub fn router(store: Arc<dyn StateStore>, config: &RoutingConfig) -> Router {
    let state = AppState {
        store,
        pause_length: config.pause_length,
    };
    let form_prefix: Arc<str> = Arc::from(config.form_to_json_prefix.as_str());

    TopicRouter::new(&config.pubsub_name)
        .route("/{id}", get(balance))
        .topic("/deposit", "deposit", post(deposit))
        .topic("/withdraw", "withdraw", post(withdraw))
        .route("/twiliopostinjson", post(voice_webhook))
        .into_router()
        .layer(middleware::from_fn_with_state(form_prefix, decode_form_to_json))
        .layer(middleware::from_fn(unwrap_cloud_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

async fn balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account = state.store.get_account(&id).await?;
    match account {
        Some(account) => Ok(Json(account)),
        None => Err(ApiError::AccountNotFound(id)),
    }
}

async fn deposit(State(state): State<AppState>, body: Bytes) -> Result<Json<Account>, ApiError> {
    let transaction: Transaction = decode(&body)?;
    debug!("Deposit of {} into {}", transaction.amount, transaction.id);

    let mut account = state
        .store
        .get_account(&transaction.id)
        .await?
        .unwrap_or_else(|| Account::open(transaction.id.clone()));

    if transaction.is_negative() {
        return Err(ApiError::NegativeAmount(transaction.amount));
    }

    if account.deposit(transaction.amount).is_none() {
        return Err(ApiError::BalanceOverflow(account.id));
    }
    state.store.save_account(&account).await?;

    Ok(Json(account))
}

async fn withdraw(State(state): State<AppState>, body: Bytes) -> Result<Json<Account>, ApiError> {
    let transaction: Transaction = decode(&body)?;
    debug!("Withdrawal of {} from {}", transaction.amount, transaction.id);

    let existing = state.store.get_account(&transaction.id).await?;
    let mut account = match existing {
        Some(account) => account,
        None => return Err(ApiError::AccountNotFound(transaction.id)),
    };

    if transaction.is_negative() {
        return Err(ApiError::NegativeAmount(transaction.amount));
    }

    if account.withdraw(transaction.amount).is_none() {
        return Err(ApiError::BalanceOverflow(account.id));
    }
    state.store.save_account(&account).await?;

    Ok(Json(account))
}

/// Answer an inbound call by putting it on hold
async fn voice_webhook(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: VoiceRequest = decode(&body)?;
    info!(
        call_sid = request.call_sid.as_deref().unwrap_or("-"),
        to = request.to.as_deref().unwrap_or("-"),
        "Holding inbound call for {}s",
        state.pause_length
    );

    let response = VoiceResponse::new().pause(state.pause_length);
    Ok(([(CONTENT_TYPE, "application/xml")], response.to_string()).into_response())
}
