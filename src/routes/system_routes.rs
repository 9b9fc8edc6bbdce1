use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::system_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(system_controller::home))
        .route("/health", get(system_controller::health))
        .route("/alert", post(system_controller::ingest_webhook))
}
