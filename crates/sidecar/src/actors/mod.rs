//! # Actors
//!
//! Proxies for calling virtual actors hosted behind the sidecar.
//!
//! An [`ActorProxy`] addresses one actor (type + id) and invokes its methods by
//! name. Typed proxies, like [`demo::DemoActorProxy`], wrap an `ActorProxy` and
//! expose the actor's interface as plain async methods.

pub mod demo;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::client::{ScheduleBody, ScheduleKind, SidecarClient};
use crate::error::SidecarResult;

/// Identifier of a single actor instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A timer registered through the sidecar; timers stop when the actor deactivates
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSpec {
    pub due_time: Duration,
    pub period: Duration,
    pub callback: Option<String>,
    pub data: Option<Value>,
}

/// A reminder registered through the sidecar; reminders persist until removed
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSpec {
    pub due_time: Duration,
    pub period: Duration,
    pub data: Option<Value>,
}

impl From<&TimerSpec> for ScheduleBody {
    fn from(spec: &TimerSpec) -> Self {
        ScheduleBody {
            due_time: format_schedule_duration(spec.due_time),
            period: format_schedule_duration(spec.period),
            callback: spec.callback.clone(),
            data: spec.data.clone(),
        }
    }
}

impl From<&ReminderSpec> for ScheduleBody {
    fn from(spec: &ReminderSpec) -> Self {
        ScheduleBody {
            due_time: format_schedule_duration(spec.due_time),
            period: format_schedule_duration(spec.period),
            callback: None,
            data: spec.data.clone(),
        }
    }
}

/// Encode a duration the way the sidecar expects it, e.g. `0h0m9s0ms`
pub fn format_schedule_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!(
        "{}h{}m{}s{}ms",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60,
        duration.subsec_millis()
    )
}

/// Untyped proxy: invokes methods on one actor by name
#[derive(Debug, Clone)]
pub struct ActorProxy {
    client: SidecarClient,
    actor_type: String,
    actor_id: ActorId,
}

impl ActorProxy {
    pub fn new(client: SidecarClient, actor_id: ActorId, actor_type: impl Into<String>) -> Self {
        Self {
            client,
            actor_type: actor_type.into(),
            actor_id,
        }
    }

    pub fn actor_type(&self) -> &str {
        &self.actor_type
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Invoke a method that takes no argument; the reply is discarded
    pub async fn invoke(&self, method: &str) -> SidecarResult<()> {
        debug!("Invoking {}/{}/{}", self.actor_type, self.actor_id, method);
        self.client
            .invoke_actor_method(&self.actor_type, self.actor_id.as_str(), method, None, "")
            .await
            .map(|_| ())
    }

    /// Invoke a method with a JSON argument; the reply is discarded
    pub async fn invoke_with<T: Serialize>(&self, method: &str, payload: &T) -> SidecarResult<()> {
        debug!("Invoking {}/{}/{} with payload", self.actor_type, self.actor_id, method);
        self.client
            .invoke_actor_method_json(&self.actor_type, self.actor_id.as_str(), method, payload)
            .await
            .map(|_| ())
    }

    /// Invoke a method that takes no argument and decode its JSON reply
    pub async fn invoke_for<R: DeserializeOwned>(&self, method: &str) -> SidecarResult<R> {
        debug!("Invoking {}/{}/{} for result", self.actor_type, self.actor_id, method);
        let bytes = self
            .client
            .invoke_actor_method(&self.actor_type, self.actor_id.as_str(), method, None, "")
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Invoke a method with a JSON argument and decode its JSON reply
    pub async fn invoke_with_for<T: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        payload: &T,
    ) -> SidecarResult<R> {
        let bytes = self
            .client
            .invoke_actor_method_json(&self.actor_type, self.actor_id.as_str(), method, payload)
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn register_timer(&self, name: &str, spec: &TimerSpec) -> SidecarResult<()> {
        self.client
            .register_actor_schedule(
                ScheduleKind::Timer,
                &self.actor_type,
                self.actor_id.as_str(),
                name,
                &ScheduleBody::from(spec),
            )
            .await
    }

    pub async fn unregister_timer(&self, name: &str) -> SidecarResult<()> {
        self.client
            .unregister_actor_schedule(ScheduleKind::Timer, &self.actor_type, self.actor_id.as_str(), name)
            .await
    }

    pub async fn register_reminder(&self, name: &str, spec: &ReminderSpec) -> SidecarResult<()> {
        self.client
            .register_actor_schedule(
                ScheduleKind::Reminder,
                &self.actor_type,
                self.actor_id.as_str(),
                name,
                &ScheduleBody::from(spec),
            )
            .await
    }

    pub async fn unregister_reminder(&self, name: &str) -> SidecarResult<()> {
        self.client
            .unregister_actor_schedule(
                ScheduleKind::Reminder,
                &self.actor_type,
                self.actor_id.as_str(),
                name,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_schedule_duration() {
        assert_eq!(format_schedule_duration(Duration::from_secs(9)), "0h0m9s0ms");
        assert_eq!(format_schedule_duration(Duration::from_millis(3_723_250)), "1h2m3s250ms");
        assert_eq!(format_schedule_duration(Duration::ZERO), "0h0m0s0ms");
    }

    #[test]
    fn test_reminder_body() {
        let spec = ReminderSpec {
            due_time: Duration::from_secs(5),
            period: Duration::from_secs(5),
            data: Some(serde_json::json!("reminder data")),
        };
        let body = ScheduleBody::from(&spec);
        assert_eq!(body.due_time, "0h0m5s0ms");
        assert_eq!(body.callback, None);
        assert_eq!(body.data, Some(serde_json::json!("reminder data")));
    }

    #[test]
    fn test_actor_id_display() {
        let id = ActorId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id, ActorId::new(String::from("abc")));
    }
}
