//! Client configuration and environment overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `COINSPREAD_HTTP_TIMEOUT_MS` | `10000` | Per-request timeout |
//! | `COINSPREAD_CALL_TIMEOUT_MS` | `15000` | Budget for one adapter `quote` call |
//! | `COINSPREAD_BINANCE_URL` | `https://api.binance.com/api/v3` | Binance base URL |
//! | `COINSPREAD_BYBIT_URL` | `https://api-testnet.bybit.com` | Bybit base URL |
//! | `COINSPREAD_JBEX_URL` | `https://api.jbex.com` | Jbex base URL |
//! | `COINSPREAD_POLONIEX_URL` | `https://api.poloniex.com` | Poloniex base URL |
//! | `COINSPREAD_WHITEBIT_URL` | `https://whitebit.com/api/v4` | Whitebit base URL |

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use tracing::warn;

use crate::http_client::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::ExchangeId;

pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 15_000;

const ENV_PREFIX: &str = "COINSPREAD";

/// Default public REST base URL for an exchange.
pub const fn default_base_url(exchange: ExchangeId) -> &'static str {
    match exchange {
        ExchangeId::Binance => "https://api.binance.com/api/v3",
        ExchangeId::Bybit => "https://api-testnet.bybit.com",
        ExchangeId::Jbex => "https://api.jbex.com",
        ExchangeId::Poloniex => "https://api.poloniex.com",
        ExchangeId::Whitebit => "https://whitebit.com/api/v4",
    }
}

/// Transport settings shared by all adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub request_timeout_ms: u64,
    pub call_timeout_ms: u64,
    base_urls: BTreeMap<ExchangeId, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            base_urls: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `COINSPREAD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = read_millis(&lookup, "HTTP_TIMEOUT_MS") {
            config.request_timeout_ms = value;
        }
        if let Some(value) = read_millis(&lookup, "CALL_TIMEOUT_MS") {
            config.call_timeout_ms = value;
        }

        for exchange in ExchangeId::ALL {
            let key = format!(
                "{ENV_PREFIX}_{}_URL",
                exchange.as_str().to_ascii_uppercase()
            );
            if let Some(url) = lookup(&key).filter(|url| !url.trim().is_empty()) {
                config = config.with_base_url(exchange, url);
            }
        }

        config
    }

    pub fn with_base_url(mut self, exchange: ExchangeId, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_urls
            .insert(exchange, url.trim().trim_end_matches('/').to_owned());
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_call_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.call_timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self, exchange: ExchangeId) -> &str {
        self.base_urls
            .get(&exchange)
            .map_or(default_base_url(exchange), String::as_str)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

fn read_millis<F>(lookup: &F, suffix: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}_{suffix}");
    let raw = lookup(&key)?;
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!(variable = %key, value = %raw, "ignoring invalid timeout override");
            None
        }
        Ok(value) => Some(value),
    }
}
