use std::sync::Arc;

use serde::Deserialize;

use super::{first_usable_price, lenient_price, Transport};
use crate::config::ClientConfig;
use crate::exchange::{AdapterFuture, ExchangeAdapter, PairListing};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

const BROKER_INFO_PATH: &str = "/openapi/v1/brokerInfo";
const TICKER_PRICE_PATH: &str = "/openapi/quote/v1/ticker/price";

/// Jbex broker API adapter.
#[derive(Clone)]
pub struct JbexAdapter {
    transport: Transport,
}

impl Default for JbexAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), &ClientConfig::default())
    }
}

impl JbexAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(ExchangeId::Jbex, http_client, config),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, &ClientConfig::default())
    }
}

impl ExchangeAdapter for JbexAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Jbex
    }

    fn symbol_separator(&self) -> &'static str {
        ""
    }

    /// The server filters by `status=TRADING`; entries that still carry a
    /// different status are dropped here as well.
    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move {
            let request = self
                .transport
                .get(BROKER_INFO_PATH)
                .with_query("status", "TRADING");
            let info: BrokerInfoResponse = self.transport.fetch_json(request).await?;

            Ok(info
                .symbols
                .into_iter()
                .map(|entry| PairListing {
                    symbol: entry.symbol,
                    status: entry.status,
                    price: None,
                })
                .filter(PairListing::is_tradable)
                .collect())
        })
    }

    fn quote<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>> {
        Box::pin(async move {
            if !self.has_pair(pair).await? {
                return Ok(None);
            }

            let orderings = pair.orderings(self.symbol_separator());
            let requests = orderings
                .iter()
                .map(|symbol| {
                    self.transport
                        .get(TICKER_PRICE_PATH)
                        .with_query("symbol", symbol.as_str())
                })
                .collect();

            let (index, ticker) = self
                .transport
                .fetch_first_json::<JbexTicker, _>(requests, |_| Ok(()))
                .await?;

            let symbol = ticker
                .symbol
                .unwrap_or_else(|| orderings[index].clone());
            self.transport
                .record(symbol, first_usable_price(&[ticker.price]))
                .map(Some)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BrokerInfoResponse {
    #[serde(default)]
    symbols: Vec<BrokerSymbol>,
}

#[derive(Debug, Clone, Deserialize)]
struct BrokerSymbol {
    symbol: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct JbexTicker {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    price: Option<f64>,
}
