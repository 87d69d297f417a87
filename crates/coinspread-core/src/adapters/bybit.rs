use std::sync::Arc;

use serde::Deserialize;

use super::{first_usable_price, lenient_price, Transport};
use crate::config::ClientConfig;
use crate::exchange::{AdapterFuture, ExchangeAdapter, PairListing, UpstreamError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

const TICKERS_PATH: &str = "/v5/market/tickers";

/// Bybit v5 adapter.
///
/// Bybit has no status field; a pair counts as listed when the spot ticker
/// catalog contains it. Prices are read from the linear (derivatives) market
/// first and the spot market second, trying both symbol orderings in each.
#[derive(Clone)]
pub struct BybitAdapter {
    transport: Transport,
}

impl Default for BybitAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), &ClientConfig::default())
    }
}

impl BybitAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(ExchangeId::Bybit, http_client, config),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, &ClientConfig::default())
    }

    fn ticker_request(&self, category: &str, symbol: &str) -> HttpRequest {
        self.transport
            .get(TICKERS_PATH)
            .with_query("symbol", symbol)
            .with_query("category", category)
    }

    /// Attempt order: linear `AB`, linear `BA`, spot `BA`, spot `AB`.
    fn ticker_requests(&self, pair: &CurrencyPair) -> Vec<HttpRequest> {
        let joined = pair.joined(self.symbol_separator());
        let reversed = pair.reversed(self.symbol_separator());

        vec![
            self.ticker_request("linear", &joined),
            self.ticker_request("linear", &reversed),
            self.ticker_request("spot", &reversed),
            self.ticker_request("spot", &joined),
        ]
    }
}

impl ExchangeAdapter for BybitAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Bybit
    }

    fn symbol_separator(&self) -> &'static str {
        ""
    }

    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move {
            let response: BybitResponse = self
                .transport
                .fetch_json(self.transport.get(TICKERS_PATH).with_query("category", "spot"))
                .await?;
            check_ret_code(&response)?;

            Ok(response
                .into_tickers()
                .into_iter()
                .map(|ticker| {
                    let price = ticker.last_price;
                    PairListing::new(ticker.symbol).with_price(price)
                })
                .collect())
        })
    }

    fn quote<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>> {
        Box::pin(async move {
            if !self.has_pair(pair).await? {
                return Ok(None);
            }

            let (_, response) = self
                .transport
                .fetch_first_json::<BybitResponse, _>(self.ticker_requests(pair), check_ret_code)
                .await?;

            // A successful answer with no ticker means the pair has no quote.
            let Some(ticker) = response.into_tickers().into_iter().next() else {
                return Ok(None);
            };

            let price = first_usable_price(&[ticker.index_price, ticker.last_price]);
            self.transport.record(ticker.symbol, price).map(Some)
        })
    }
}

fn check_ret_code(response: &BybitResponse) -> Result<(), UpstreamError> {
    if response.ret_code == 0 {
        return Ok(());
    }
    Err(UpstreamError::api(
        ExchangeId::Bybit,
        format!("retCode {}: {}", response.ret_code, response.ret_msg),
    ))
}

#[derive(Debug, Clone, Deserialize)]
struct BybitResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    #[serde(default)]
    result: Option<BybitTickerList>,
}

impl BybitResponse {
    fn into_tickers(self) -> Vec<BybitTicker> {
        self.result.map(|result| result.list).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BybitTickerList {
    #[serde(default)]
    list: Vec<BybitTicker>,
}

#[derive(Debug, Clone, Deserialize)]
struct BybitTicker {
    symbol: String,
    #[serde(rename = "indexPrice", default, deserialize_with = "lenient_price")]
    index_price: Option<f64>,
    #[serde(rename = "lastPrice", default, deserialize_with = "lenient_price")]
    last_price: Option<f64>,
}
