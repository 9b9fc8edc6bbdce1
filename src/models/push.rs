use serde::{Deserialize, Serialize};

/// Delivery-endpoint descriptor posted by the browser. Treated as opaque:
/// only `endpoint` is interpreted, everything else rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body shape the service-worker side expects (`{title, body}`).
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}
