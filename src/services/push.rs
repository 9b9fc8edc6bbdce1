use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;

use crate::models::{PushPayload, PushSubscription};

const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Best-effort sink for out-of-band trigger notifications. Holds at most one
/// subscription (last write wins); delivery failures are logged and dropped.
#[derive(Clone)]
pub struct PushGateway {
    http: Client,
    enabled: bool,
    subscription: Arc<Mutex<Option<PushSubscription>>>,
}

impl PushGateway {
    pub fn new(enabled: bool) -> Self {
        Self {
            http: Client::new(),
            enabled,
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the stored push target. No history is kept.
    pub fn set_subscription(&self, sub: PushSubscription) {
        let mut slot = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(sub);
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Delivers `payload` to the current subscription, if any. Never fails
    /// from the caller's point of view.
    pub async fn notify(&self, payload: &PushPayload) {
        if !self.enabled {
            return;
        }

        let target = {
            let slot = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
            slot.clone()
        };

        let Some(sub) = target else {
            return;
        };

        let res = self
            .http
            .post(&sub.endpoint)
            .json(payload)
            .timeout(PUSH_TIMEOUT)
            .send()
            .await;

        match res {
            Ok(res) if !res.status().is_success() => {
                tracing::warn!("push delivery returned status {}", res.status());
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("push delivery failed: {}", err);
            }
        }
    }
}
