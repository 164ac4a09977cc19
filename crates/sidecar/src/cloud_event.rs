//! Cloud event envelopes
//!
//! The pub/sub broker delivers each event wrapped in a cloud event. Handlers
//! only care about `data`, so [`unwrap_cloud_event`] strips the envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SidecarResult;

pub const CLOUD_EVENT_CONTENT_TYPE: &str = "application/cloudevents+json";

const DEFAULT_DATA_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent<T = Value> {
    #[serde(default)]
    pub specversion: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub datacontenttype: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub pubsubname: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Strip the envelope, returning the payload bytes and their content type
pub fn unwrap_cloud_event(body: &[u8]) -> SidecarResult<(Vec<u8>, String)> {
    let event: CloudEvent = serde_json::from_slice(body)?;
    let content_type = event
        .datacontenttype
        .unwrap_or_else(|| DEFAULT_DATA_CONTENT_TYPE.to_string());

    let payload = match event.data {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) if !is_json(&content_type) => text.into_bytes(),
        Some(data) => serde_json::to_vec(&data)?,
    };

    Ok((payload, content_type))
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence == "application/json" || essence.ends_with("+json")
}
