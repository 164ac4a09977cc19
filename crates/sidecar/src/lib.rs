//! # Sidecar
//!
//! Client library for the Dapr sidecar HTTP API.
//!
//! The sidecar runs next to an application and exposes state storage, pub/sub
//! publishing and virtual actors over a local HTTP endpoint (port 3500 by
//! default). This crate wraps that endpoint in a small typed client.
//!
//! ## Core Features
//!
//! * **State**: get, save and delete keys in a named state store
//! * **Pub/Sub**: publish events to a topic
//! * **Actors**: invoke actor methods through an untyped [`ActorProxy`] or a
//!   typed proxy such as [`DemoActorProxy`], and manage actor timers and reminders
//! * **Cloud events**: unwrap the envelope the broker puts around delivered events
//!
//! ## Example Usage
//!
//! ```no_run
//! use sidecar::{ActorId, DemoActor, DemoActorProxy, MyData, SidecarClient, SidecarConfig};
//!
//! # async fn run() -> sidecar::SidecarResult<()> {
//! let client = SidecarClient::new(SidecarConfig::from_env())?;
//! let proxy = DemoActorProxy::new(client, ActorId::from("abc"));
//! proxy.save_data(MyData::new("ValueA", "ValueB")).await?;
//! let data = proxy.get_data().await?;
//! println!("{}", data);
//! # Ok(())
//! # }
//! ```

pub mod actors;
pub mod client;
pub mod cloud_event;
pub mod config;
pub mod error;
pub mod logging;

pub use actors::demo::{DemoActor, DemoActorProxy, MyData, DEMO_ACTOR_TYPE};
pub use actors::{ActorId, ActorProxy, ReminderSpec, TimerSpec};
pub use client::SidecarClient;
pub use cloud_event::{unwrap_cloud_event, CloudEvent, CLOUD_EVENT_CONTENT_TYPE};
pub use config::SidecarConfig;
pub use error::{SidecarError, SidecarResult};
