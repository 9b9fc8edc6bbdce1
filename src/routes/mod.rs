use axum::Router;
use tower_http::services::ServeDir;

use crate::{controllers::system_controller, AppState};

pub mod alerts_routes;
pub mod push_routes;
pub mod realtime_routes;
pub mod system_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = system_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);
    let router = realtime_routes::add_routes(router);
    let router = push_routes::add_routes(router);

    router
        .nest_service("/static", ServeDir::new("static"))
        .fallback(system_controller::not_found)
        .with_state(state)
}
