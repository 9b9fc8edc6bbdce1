use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::models::{Alert, AlertEvent, PushPayload};
use crate::services::alert_store::AlertStore;
use crate::services::market::PriceSource;
use crate::services::push::PushGateway;
use crate::AppState;

pub fn spawn_price_alert_monitor(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(state.settings.poll_interval_secs));
        // A cycle that outlives its interval drops the next tick instead of
        // queueing a second concurrent fetch fan-out.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            run_tick(&state.store, &state.market, &state.events_tx, &state.push).await;
        }
    })
}

/// One poll cycle: snapshot, group by symbol, fetch each distinct symbol
/// once, evaluate, notify, remove triggered alerts.
pub async fn run_tick<S: PriceSource>(
    store: &AlertStore,
    source: &S,
    events_tx: &broadcast::Sender<AlertEvent>,
    push: &PushGateway,
) {
    let snapshot = store.list();
    if snapshot.is_empty() {
        return;
    }

    let mut by_symbol: HashMap<String, Vec<Alert>> = HashMap::new();
    for alert in snapshot {
        by_symbol.entry(alert.symbol.clone()).or_default().push(alert);
    }

    for (symbol, group) in by_symbol {
        let price = match source.fetch_price(&symbol).await {
            Ok(p) => p,
            Err(err) => {
                // This symbol's alerts stay put and retry next cycle; the
                // rest of the cycle is unaffected.
                tracing::warn!("price fetch for {} failed: {}", symbol, err);
                let _ = events_tx.send(AlertEvent::FetchError {
                    symbol,
                    message: err.to_string(),
                });
                continue;
            }
        };

        if !price.is_finite() || price <= 0.0 {
            let _ = events_tx.send(AlertEvent::FetchError {
                symbol,
                message: format!("unusable price {}", price),
            });
            continue;
        }

        let ts = chrono::Utc::now().timestamp();
        let _ = events_tx.send(AlertEvent::PriceUpdate {
            symbol: symbol.clone(),
            price,
            ts,
        });

        for alert in group {
            if !alert.condition.is_met(price, alert.threshold) {
                continue;
            }

            // An API delete may have raced us; removal is idempotent either
            // way and the alert fires at most once.
            if !store.remove(alert.id) {
                continue;
            }

            tracing::info!(
                "alert triggered: {} {} {} at {}",
                alert.symbol,
                alert.condition,
                alert.threshold,
                price
            );

            push.notify(&PushPayload {
                title: format!("{} alert", alert.symbol),
                body: format!(
                    "{} is {} {:.2} (current: {:.2})",
                    alert.symbol, alert.condition, alert.threshold, price
                ),
            })
            .await;

            let _ = events_tx.send(AlertEvent::Triggered { alert, price, ts });
        }
    }
}
