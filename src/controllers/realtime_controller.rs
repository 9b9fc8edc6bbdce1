use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::models::AlertEvent;
use crate::AppState;

fn sse_frame(event: &AlertEvent) -> Event {
    Event::default()
        .event(event.kind())
        .data(serde_json::to_string(event).unwrap_or_default())
}

// GET /sse
//
// First frame is an `init` snapshot of the current alerts; after that the
// stream forwards every fan-out event. Dropping the connection drops the
// broadcast receiver, so there is no listener registry to clean up.
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let init = AlertEvent::Init {
        alerts: state.store.list(),
    };
    let first = stream::once(async move { Ok(sse_frame(&init)) });

    let rest = stream::unfold(rx, |mut rx| async {
        let evt = match rx.recv().await {
            Ok(event) => sse_frame(&event),
            Err(RecvError::Lagged(skipped)) => Event::default()
                .event("ping")
                .data(format!("lagged {}", skipped)),
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(evt), rx))
    });

    Sse::new(first.chain(rest)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(20))
            .text("keep-alive"),
    )
}
