//! Exchange adapter implementations.
//!
//! | Exchange | Symbol join | Status filter | Price fields |
//! |----------|-------------|---------------|--------------|
//! | Binance | `BTCUSDT` | `TRADING` | `price` |
//! | Bybit | `BTCUSDT` | none | `indexPrice`, `lastPrice` |
//! | Jbex | `BTCUSDT` | `TRADING` | `price` |
//! | Poloniex | `BTC_USDT` | none | `price` |
//! | Whitebit | `BTC_USDT` | none | `last_price` |

pub mod binance;
pub mod bybit;
pub mod jbex;
pub mod poloniex;
pub mod whitebit;

pub use binance::BinanceAdapter;
pub use bybit::BybitAdapter;
pub use jbex::JbexAdapter;
pub use poloniex::PoloniexAdapter;
pub use whitebit::WhitebitAdapter;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::exchange::UpstreamError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{ExchangeId, TradingPairRecord};

/// Per-adapter HTTP plumbing: base URL, timeout and error mapping.
#[derive(Clone)]
pub(crate) struct Transport {
    exchange: ExchangeId,
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    request_timeout_ms: u64,
}

impl Transport {
    pub(crate) fn new(
        exchange: ExchangeId,
        http_client: Arc<dyn HttpClient>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            exchange,
            http_client,
            base_url: config.base_url(exchange).to_owned(),
            request_timeout_ms: config.request_timeout_ms,
        }
    }

    pub(crate) fn get(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{path}", self.base_url))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.request_timeout_ms)
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UpstreamError> {
        let url = request.full_url();
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| UpstreamError::from_http(self.exchange, &error))?;

        if !response.is_success() {
            return Err(UpstreamError::status(self.exchange, response.status, &url));
        }

        Ok(response)
    }

    pub(crate) async fn fetch_json<T>(&self, request: HttpRequest) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let url = request.full_url();
        let response = self.send(request).await?;
        response.json().map_err(|error| {
            UpstreamError::parse(self.exchange, format!("failed to parse {url}: {error}"))
        })
    }

    /// Tries `requests` in order and returns the first body that parses and
    /// passes `accept`, together with the index of the winning request.
    pub(crate) async fn fetch_first_json<T, F>(
        &self,
        requests: Vec<HttpRequest>,
        accept: F,
    ) -> Result<(usize, T), UpstreamError>
    where
        T: DeserializeOwned + Send,
        F: Fn(&T) -> Result<(), UpstreamError> + Send,
    {
        let mut last_error = None;

        for (index, request) in requests.into_iter().enumerate() {
            let url = request.full_url();
            let attempt = self
                .fetch_json::<T>(request)
                .await
                .and_then(|body| accept(&body).map(|()| body));

            match attempt {
                Ok(body) => return Ok((index, body)),
                Err(error) => {
                    debug!(
                        exchange = %self.exchange,
                        url = %url,
                        error = %error,
                        "price request failed; trying next ordering"
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            UpstreamError::api(self.exchange, "no price request was attempted")
        }))
    }

    pub(crate) fn record(
        &self,
        symbol: impl Into<String>,
        price: f64,
    ) -> Result<TradingPairRecord, UpstreamError> {
        TradingPairRecord::new(self.exchange, symbol, price)
            .map_err(|error| UpstreamError::parse(self.exchange, error.to_string()))
    }
}

/// Accepts JSON numbers and numeric strings; anything else, including
/// negative or non-finite values, becomes `None`.
pub(crate) fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(price_from_value))
}

fn price_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// First usable price in priority order, or the `0.0` sentinel.
pub(crate) fn first_usable_price(candidates: &[Option<f64>]) -> f64 {
    candidates.iter().flatten().copied().next().unwrap_or(0.0)
}
