use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use trading_alerts::{config, routes, services::alert_monitor, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    if !settings.push_configured() {
        tracing::warn!("VAPID keys missing, push delivery disabled");
    }

    let state = AppState::new(settings.clone());
    let monitor = alert_monitor::spawn_price_alert_monitor(state.clone());

    let app = routes::app(state);

    let ip = settings
        .host
        .parse::<IpAddr>()
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let addr = SocketAddr::from((ip, settings.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // Stop the poll timer; in-flight fetches finish or time out on their own.
    monitor.abort();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
