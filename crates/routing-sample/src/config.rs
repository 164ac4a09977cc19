/// Default pub/sub component name
pub const DEFAULT_PUBSUB_NAME: &str = "pubsub";

/// Default hold time for inbound calls (three minutes)
pub const DEFAULT_PAUSE_SECS: u32 = 180;

/// Path prefix whose form posts are rewritten as JSON
pub const DEFAULT_FORM_TO_JSON_PREFIX: &str = "TwilioPost";

/// Settings that shape the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    pub pubsub_name: String,
    pub pause_length: u32,
    pub form_to_json_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pubsub_name: DEFAULT_PUBSUB_NAME.to_string(),
            pause_length: DEFAULT_PAUSE_SECS,
            form_to_json_prefix: DEFAULT_FORM_TO_JSON_PREFIX.to_string(),
        }
    }
}
