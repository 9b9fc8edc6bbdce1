use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ValidationError};
use crate::models::{Alert, AlertEvent};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateAlertBody {
    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub condition: Option<String>,

    // The frontend sends this as either a number or a numeric string.
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

fn parse_price(value: &serde_json::Value) -> Result<f64, ValidationError> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().ok_or(ValidationError::BadPrice),
        serde_json::Value::String(s) => {
            s.trim().parse::<f64>().map_err(|_| ValidationError::BadPrice)
        }
        _ => Err(ValidationError::BadPrice),
    }
}

// GET /api/alerts
pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.store.list())
}

// POST /api/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    Json(body): Json<CreateAlertBody>,
) -> Result<Json<Alert>, ApiError> {
    let symbol = body
        .symbol
        .as_deref()
        .ok_or(ValidationError::MissingField("symbol"))?;
    let condition = body
        .condition
        .as_deref()
        .ok_or(ValidationError::MissingField("condition"))?;
    let price = body
        .price
        .as_ref()
        .ok_or(ValidationError::MissingField("price"))
        .and_then(parse_price)?;

    let alert = state.store.add(symbol, condition, price)?;

    tracing::info!(
        "alert created: {} {} {}",
        alert.symbol,
        alert.condition,
        alert.threshold
    );
    let _ = state.events_tx.send(AlertEvent::NewAlert {
        alert: alert.clone(),
    });

    Ok(Json(alert))
}

// DELETE /api/alerts/:id
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    // A malformed id cannot name a stored alert, so it reads as not-found.
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;

    if !state.store.remove(id) {
        return Err(ApiError::NotFound);
    }

    let _ = state.events_tx.send(AlertEvent::RemovedAlert { id });

    Ok(StatusCode::NO_CONTENT.into_response())
}
