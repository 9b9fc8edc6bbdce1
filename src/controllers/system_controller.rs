use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

// GET /
pub async fn home() -> &'static str {
    "Trading Alerts Server is Running!"
}

// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "alerts": state.store.len() }))
}

// POST /alert — webhook ingestion from an external signal source. The
// payload is logged and acknowledged, nothing else happens with it.
pub async fn ingest_webhook(Json(payload): Json<serde_json::Value>) -> Json<serde_json::Value> {
    tracing::info!("received alert webhook: {}", payload);

    Json(json!({ "success": true, "message": "Alert received" }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
