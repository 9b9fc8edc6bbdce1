use serde::Serialize;
use uuid::Uuid;

use crate::models::Alert;

/// Everything the fan-out channel carries to live listeners.
///
/// `Init` is never broadcast; the SSE handler sends it to each new listener
/// as its first frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AlertEvent {
    Init {
        alerts: Vec<Alert>,
    },
    NewAlert {
        alert: Alert,
    },
    RemovedAlert {
        id: Uuid,
    },
    PriceUpdate {
        symbol: String,
        price: f64,
        ts: i64,
    },
    Triggered {
        alert: Alert,
        price: f64,
        ts: i64,
    },
    FetchError {
        symbol: String,
        message: String,
    },
}

impl AlertEvent {
    /// SSE event name for this payload.
    pub fn kind(&self) -> &'static str {
        match self {
            AlertEvent::Init { .. } => "init",
            AlertEvent::NewAlert { .. } => "newAlert",
            AlertEvent::RemovedAlert { .. } => "removedAlert",
            AlertEvent::PriceUpdate { .. } => "priceUpdate",
            AlertEvent::Triggered { .. } => "triggered",
            AlertEvent::FetchError { .. } => "fetchError",
        }
    }
}
