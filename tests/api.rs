use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use trading_alerts::{config::Settings, routes, AppState};

fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        market_provider: String::new(),
        market_api_key: String::new(),
        poll_interval_secs: 10,
        vapid_public_key: "test-public-key".to_string(),
        vapid_private_key: "test-private-key".to_string(),
    }
}

fn test_app() -> (AppState, Router) {
    let state = AppState::new(test_settings());
    let app = routes::app(state.clone());
    (state, app)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_alert(app: &Router, symbol: &str, condition: &str, price: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/alerts",
            json!({ "symbol": symbol, "condition": condition, "price": price }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn health_reports_alert_count() {
    let (_state, app) = test_app();

    let response = app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true, "alerts": 0 }));

    create_alert(&app, "AAPL", "above", json!(100)).await;

    let response = app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(body_json(response).await, json!({ "ok": true, "alerts": 1 }));
}

#[tokio::test]
async fn create_alert_normalizes_and_assigns_ids() {
    let (_state, app) = test_app();

    let a = create_alert(&app, "binance:btcusdt", "above", json!(43000.5)).await;
    let b = create_alert(&app, "AAPL", "below", json!("150.25")).await;

    assert_eq!(a["symbol"], "BINANCE:BTCUSDT");
    assert_eq!(a["condition"], "above");
    assert_eq!(a["threshold"], 43000.5);
    assert!(a["createdAt"].is_i64());

    assert_eq!(b["threshold"], 150.25);
    assert_ne!(a["id"], b["id"]);
}

#[tokio::test]
async fn create_alert_rejects_bad_input() {
    let (_state, app) = test_app();

    let cases = [
        json!({ "condition": "above", "price": 100 }),
        json!({ "symbol": "AAPL", "price": 100 }),
        json!({ "symbol": "AAPL", "condition": "above" }),
        json!({ "symbol": "AAPL", "condition": "sideways", "price": 100 }),
        json!({ "symbol": "AAPL", "condition": "above", "price": "not-a-number" }),
        json!({ "symbol": "AAPL", "condition": "above", "price": -5 }),
        json!({ "symbol": "AAPL", "condition": "above", "price": 0 }),
    ];

    for body in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/alerts", body.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(body_json(response).await["error"].is_string());
    }

    let response = app.clone().oneshot(get_request("/api/alerts")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn list_is_newest_first() {
    let (_state, app) = test_app();

    let first = create_alert(&app, "AAPL", "above", json!(100)).await;
    let second = create_alert(&app, "MSFT", "below", json!(300)).await;

    let response = app.clone().oneshot(get_request("/api/alerts")).await.unwrap();
    let listed = body_json(response).await;

    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["id"], second["id"]);
    assert_eq!(listed[1]["id"], first["id"]);
}

#[tokio::test]
async fn delete_alert_is_idempotent_in_effect() {
    let (_state, app) = test_app();

    let alert = create_alert(&app, "AAPL", "above", json!(100)).await;
    let uri = format!("/api/alerts/{}", alert["id"].as_str().unwrap());

    let delete = |uri: String| {
        let app = app.clone();
        async move {
            app.oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };

    let response = delete(uri.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete("/api/alerts/not-a-uuid".to_string()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_and_delete_are_broadcast() {
    let (state, app) = test_app();
    let mut rx = state.events_tx.subscribe();

    let alert = create_alert(&app, "AAPL", "above", json!(100)).await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind(), "newAlert");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/alerts/{}", alert["id"].as_str().unwrap()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind(), "removedAlert");
}

#[tokio::test]
async fn sse_stream_starts_with_init_snapshot() {
    let (_state, app) = test_app();

    create_alert(&app, "AAPL", "above", json!(100)).await;

    let response = app.clone().oneshot(get_request("/sse")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let Ok(data) = frame.into_data() else {
        panic!("expected a data frame");
    };
    let first = String::from_utf8(data.to_vec()).unwrap();

    assert!(first.starts_with("event: init"), "got: {}", first);
    assert!(first.contains("\"AAPL\""));
}

#[tokio::test]
async fn subscribe_stores_push_target() {
    let (state, app) = test_app();
    assert!(!state.push.has_subscription());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/subscribe",
            json!({
                "endpoint": "https://push.example/send/abc",
                "keys": { "p256dh": "key", "auth": "secret" }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(state.push.has_subscription());
}

#[tokio::test]
async fn vapid_public_key_is_exposed() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/vapidPublic"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "publicKey": "test-public-key" })
    );
}

#[tokio::test]
async fn webhook_acknowledges_payload() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/alert",
            json!({ "source": "tradingview", "note": "breakout" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (_state, app) = test_app();

    let response = app.clone().oneshot(get_request("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}
