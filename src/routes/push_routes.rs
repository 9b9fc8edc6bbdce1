use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::push_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/subscribe", post(push_controller::subscribe))
        .route("/api/vapidPublic", get(push_controller::vapid_public))
}
