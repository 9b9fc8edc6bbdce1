//! Library entrypoint for the trading-alerts service.
//!
//! This file exists mainly to make HTTP-level tests easy (integration tests
//! under `tests/` can build the app state and router directly).

pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use tokio::sync::broadcast;

use models::AlertEvent;
use services::{alert_store::AlertStore, market::MarketClient, push::PushGateway};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub store: AlertStore,
    pub market: MarketClient,
    pub push: PushGateway,
    pub events_tx: broadcast::Sender<AlertEvent>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> Self {
        let (events_tx, _) = broadcast::channel(100);

        let market = MarketClient::new(
            settings.market_provider.clone(),
            settings.market_api_key.clone(),
        );
        let push = PushGateway::new(settings.push_configured());

        Self {
            settings,
            store: AlertStore::new(),
            market,
            push,
            events_tx,
        }
    }
}
