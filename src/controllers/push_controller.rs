use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::models::PushSubscription;
use crate::AppState;

// POST /api/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    Json(sub): Json<PushSubscription>,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::info!("push subscription registered: {}", sub.endpoint);
    state.push.set_subscription(sub);

    (StatusCode::CREATED, Json(json!({})))
}

// GET /api/vapidPublic
pub async fn vapid_public(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "publicKey": state.settings.vapid_public_key }))
}
