//! # Routing Sample
//!
//! A small banking service driven by pub/sub events.
//!
//! The sidecar delivers `deposit` and `withdraw` events to the matching routes,
//! accounts are kept in the sidecar's state store, and an inbound voice webhook
//! is answered with a hold response.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod store;
pub mod twiml;

pub use config::RoutingConfig;
pub use error::ApiError;
pub use models::{Account, Transaction, VoiceRequest};
pub use routes::{router, AppState, Subscription, SUBSCRIBE_PATH};
pub use store::{InMemoryStateStore, SidecarStateStore, StateStore};
