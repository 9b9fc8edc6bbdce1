use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    /// Quote provider used for prefixed non-crypto symbols ("finnhub" is the
    /// only recognized value; anything else falls through to Yahoo).
    pub market_provider: String,
    pub market_api_key: String,

    pub poll_interval_secs: u64,

    /// Web-push VAPID key pair. Empty keys disable push delivery without
    /// affecting the rest of the service.
    pub vapid_public_key: String,
    pub vapid_private_key: String,
}

impl Settings {
    pub fn push_configured(&self) -> bool {
        !self.vapid_public_key.trim().is_empty() && !self.vapid_private_key.trim().is_empty()
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let market_provider = env::var("MARKET_PROVIDER").unwrap_or_default();
    let market_api_key = env::var("MARKET_API_KEY").unwrap_or_default();

    let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(10);

    let vapid_public_key = env::var("VAPID_PUBLIC_KEY").unwrap_or_default();
    let vapid_private_key = env::var("VAPID_PRIVATE_KEY").unwrap_or_default();

    Settings {
        host,
        port,
        market_provider,
        market_api_key,
        poll_interval_secs,
        vapid_public_key,
        vapid_private_key,
    }
}
