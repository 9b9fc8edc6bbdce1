use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("could not fetch price for {0}")]
    NoPrice(String),
}

/// Seam between the poller and the outbound quote providers. The production
/// implementation is [`MarketClient`]; tests substitute scripted sources.
pub trait PriceSource {
    fn fetch_price(
        &self,
        symbol: &str,
    ) -> impl std::future::Future<Output = Result<f64, FetchError>> + Send;
}

#[derive(Clone)]
pub struct MarketClient {
    http: Client,
    provider: String,
    api_key: String,
}

impl MarketClient {
    pub fn new(provider: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            provider,
            api_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn binance_ticker(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = "https://api.binance.com/api/v3/ticker/price";
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol)])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(FetchError::Status {
                provider: "binance",
                status: res.status(),
            });
        }

        let ticker = res.json::<BinanceTicker>().await?;
        ticker
            .price
            .parse::<f64>()
            .map_err(|_| FetchError::NoPrice(symbol.to_string()))
    }

    async fn finnhub_quote(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = "https://finnhub.io/api/v1/quote";
        let res = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("token", &self.api_key)])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(FetchError::Status {
                provider: "finnhub",
                status: res.status(),
            });
        }

        let quote = res.json::<FinnhubQuote>().await?;
        Ok(quote.c)
    }

    async fn yahoo_quote(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = "https://query1.finance.yahoo.com/v7/finance/quote";
        let res = self
            .http
            .get(url)
            .query(&[("symbols", &yahoo_symbol(symbol))])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(FetchError::Status {
                provider: "yahoo",
                status: res.status(),
            });
        }

        let body = res.json::<YahooResponse>().await?;
        body.quote_response
            .and_then(|q| q.result.into_iter().next())
            .and_then(|q| q.regular_market_price)
            .ok_or_else(|| FetchError::NoPrice(symbol.to_string()))
    }
}

impl PriceSource for MarketClient {
    /// Resolution order is fixed: a `BINANCE:` prefix goes straight to the
    /// exchange ticker (terminal), then the configured provider if keyed,
    /// then the Yahoo multi-quote fallback. A Finnhub price of exactly 0
    /// means "unknown symbol" and falls through to Yahoo, as does a Finnhub
    /// transport failure.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FetchError> {
        if let Some(rest) = symbol.strip_prefix("BINANCE:") {
            return self.binance_ticker(rest).await;
        }

        if self.provider == "finnhub" && self.has_key() {
            match self.finnhub_quote(trailing_symbol(symbol)).await {
                Ok(price) if price != 0.0 => return Ok(price),
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!("finnhub quote for {} failed, trying yahoo: {}", symbol, err);
                }
            }
        }

        self.yahoo_quote(symbol).await
    }
}

/// Strips an `EXCHANGE:` prefix, keeping only the trailing symbol.
fn trailing_symbol(symbol: &str) -> &str {
    match symbol.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => symbol,
    }
}

/// Yahoo addresses prefixed instruments as `EXCHANGE/SYMBOL`.
fn yahoo_symbol(symbol: &str) -> String {
    symbol.replace(':', "/")
}

#[derive(Debug, Deserialize)]
struct BinanceTicker {
    price: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FinnhubQuote {
    // current
    pub c: f64,
    // change
    pub d: f64,
    // percent change
    pub dp: f64,
    // high
    pub h: f64,
    // low
    pub l: f64,
    // open
    pub o: f64,
    // previous close
    pub pc: f64,
    // timestamp
    pub t: i64,
}

#[derive(Debug, Deserialize)]
struct YahooResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: Option<YahooQuoteResponse>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    result: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}
