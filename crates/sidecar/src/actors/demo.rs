use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use super::{ActorId, ActorProxy};
use crate::client::SidecarClient;
use crate::error::SidecarResult;

/// Actor type name the demo actor is registered under
pub const DEMO_ACTOR_TYPE: &str = "DemoActor";

/// Payload saved to and read back from the demo actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MyData {
    pub property_a: String,
    pub property_b: String,
}

impl MyData {
    pub fn new(property_a: impl Into<String>, property_b: impl Into<String>) -> Self {
        Self {
            property_a: property_a.into(),
            property_b: property_b.into(),
        }
    }
}

impl fmt::Display for MyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PropertyA: {}, PropertyB: {}",
            self.property_a, self.property_b
        )
    }
}

/// Remote interface of the demo actor
pub trait DemoActor {
    fn save_data(&self, data: MyData) -> impl Future<Output = SidecarResult<()>> + Send;

    fn get_data(&self) -> impl Future<Output = SidecarResult<MyData>> + Send;

    /// Always fails inside the actor with a not-implemented error
    fn test_throw_exception(&self) -> impl Future<Output = SidecarResult<()>> + Send;

    fn test_no_argument_no_return_type(&self) -> impl Future<Output = SidecarResult<()>> + Send;

    fn register_reminder(&self) -> impl Future<Output = SidecarResult<()>> + Send;

    fn unregister_reminder(&self) -> impl Future<Output = SidecarResult<()>> + Send;

    fn register_timer(&self) -> impl Future<Output = SidecarResult<()>> + Send;

    fn unregister_timer(&self) -> impl Future<Output = SidecarResult<()>> + Send;
}

/// Typed proxy for [`DemoActor`]
#[derive(Debug, Clone)]
pub struct DemoActorProxy {
    inner: ActorProxy,
}

impl DemoActorProxy {
    pub fn new(client: SidecarClient, actor_id: ActorId) -> Self {
        Self {
            inner: ActorProxy::new(client, actor_id, DEMO_ACTOR_TYPE),
        }
    }
}

impl DemoActor for DemoActorProxy {
    async fn save_data(&self, data: MyData) -> SidecarResult<()> {
        self.inner.invoke_with("SaveData", &data).await
    }

    async fn get_data(&self) -> SidecarResult<MyData> {
        self.inner.invoke_for("GetData").await
    }

    async fn test_throw_exception(&self) -> SidecarResult<()> {
        self.inner.invoke("TestThrowException").await
    }

    async fn test_no_argument_no_return_type(&self) -> SidecarResult<()> {
        self.inner.invoke("TestNoArgumentNoReturnType").await
    }

    async fn register_reminder(&self) -> SidecarResult<()> {
        self.inner.invoke("RegisterReminder").await
    }

    async fn unregister_reminder(&self) -> SidecarResult<()> {
        self.inner.invoke("UnregisterReminder").await
    }

    async fn register_timer(&self) -> SidecarResult<()> {
        self.inner.invoke("RegisterTimer").await
    }

    async fn unregister_timer(&self) -> SidecarResult<()> {
        self.inner.invoke("UnregisterTimer").await
    }
}
