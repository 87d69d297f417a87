use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::{first_usable_price, lenient_price, Transport};
use crate::config::ClientConfig;
use crate::exchange::{AdapterFuture, ExchangeAdapter, PairListing};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

const MARKETS_PATH: &str = "/public/markets";
const TICKER_PATH: &str = "/public/ticker";

/// Whitebit v4 public API adapter.
///
/// The ticker endpoint returns every market at once, keyed by `BASE_QUOTE`.
#[derive(Clone)]
pub struct WhitebitAdapter {
    transport: Transport,
}

impl Default for WhitebitAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), &ClientConfig::default())
    }
}

impl WhitebitAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(ExchangeId::Whitebit, http_client, config),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, &ClientConfig::default())
    }
}

impl ExchangeAdapter for WhitebitAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Whitebit
    }

    fn symbol_separator(&self) -> &'static str {
        "_"
    }

    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move {
            let markets: Vec<WhitebitMarket> = self
                .transport
                .fetch_json(self.transport.get(MARKETS_PATH))
                .await?;

            Ok(markets
                .into_iter()
                .map(|market| PairListing::new(market.name))
                .collect())
        })
    }

    fn quote<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>> {
        Box::pin(async move {
            if !self.has_pair(pair).await? {
                return Ok(None);
            }

            let tickers: HashMap<String, WhitebitTicker> = self
                .transport
                .fetch_json(self.transport.get(TICKER_PATH))
                .await?;

            let matched = pair
                .orderings(self.symbol_separator())
                .into_iter()
                .find_map(|symbol| tickers.get(&symbol).map(|ticker| (symbol, ticker)));

            let Some((symbol, ticker)) = matched else {
                return Ok(None);
            };

            self.transport
                .record(symbol, first_usable_price(&[ticker.last_price]))
                .map(Some)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WhitebitMarket {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct WhitebitTicker {
    #[serde(default, deserialize_with = "lenient_price")]
    last_price: Option<f64>,
}
