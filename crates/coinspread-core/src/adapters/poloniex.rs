use std::sync::Arc;

use serde::Deserialize;

use super::{first_usable_price, lenient_price, Transport};
use crate::config::ClientConfig;
use crate::exchange::{find_listing, AdapterFuture, ExchangeAdapter, PairListing};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

const MARKETS_PRICE_PATH: &str = "/markets/price";

/// Poloniex adapter. The `/markets/price` catalog already carries prices, so
/// a quote costs a single request.
#[derive(Clone)]
pub struct PoloniexAdapter {
    transport: Transport,
}

impl Default for PoloniexAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), &ClientConfig::default())
    }
}

impl PoloniexAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(ExchangeId::Poloniex, http_client, config),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, &ClientConfig::default())
    }
}

impl ExchangeAdapter for PoloniexAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Poloniex
    }

    fn symbol_separator(&self) -> &'static str {
        "_"
    }

    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move {
            let prices: Vec<MarketPrice> = self
                .transport
                .fetch_json(self.transport.get(MARKETS_PRICE_PATH))
                .await?;

            Ok(prices
                .into_iter()
                .map(|entry| PairListing::new(entry.symbol).with_price(entry.price))
                .collect())
        })
    }

    fn quote<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>> {
        Box::pin(async move {
            let listings = self.list_pairs().await?;
            let Some(listing) = find_listing(&listings, pair, self.symbol_separator()) else {
                return Ok(None);
            };

            self.transport
                .record(listing.symbol.clone(), first_usable_price(&[listing.price]))
                .map(Some)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MarketPrice {
    symbol: String,
    #[serde(default, deserialize_with = "lenient_price")]
    price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::UpstreamErrorKind;
    use crate::test_support::{block_on, ScriptedHttpClient};

    const PRICES_URL: &str = "https://api.poloniex.com/markets/price";
    const PRICES_BODY: &str = r#"[
        {"symbol":"BTC_USDT","price":"50250.10","time":1700000000000},
        {"symbol":"ETH_BTC","price":"0.0513"},
        {"symbol":"TRX_USDT","price":""}
    ]"#;

    fn adapter(client: ScriptedHttpClient) -> (PoloniexAdapter, Arc<ScriptedHttpClient>) {
        let client = Arc::new(client);
        (PoloniexAdapter::with_http_client(client.clone()), client)
    }

    fn pair(first: &str, second: &str) -> CurrencyPair {
        CurrencyPair::parse(first, second).expect("valid pair")
    }

    #[test]
    fn quote_reads_price_from_catalog_in_one_request() {
        let (adapter, client) = adapter(ScriptedHttpClient::new().with_json(PRICES_URL, PRICES_BODY));

        let record = block_on(adapter.quote(&pair("usdt", "btc")))
            .expect("quote should succeed")
            .expect("pair is listed");

        assert_eq!(record.symbol, "BTC_USDT");
        assert_eq!(record.price, 50_250.1);
        assert_eq!(client.requested_urls(), vec![PRICES_URL.to_owned()]);
    }

    #[test]
    fn empty_price_string_becomes_zero() {
        let (adapter, _) = adapter(ScriptedHttpClient::new().with_json(PRICES_URL, PRICES_BODY));

        let record = block_on(adapter.quote(&pair("trx", "usdt")))
            .expect("quote should succeed")
            .expect("pair is listed");
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn unlisted_pair_is_absent() {
        let (adapter, _) = adapter(ScriptedHttpClient::new().with_json(PRICES_URL, PRICES_BODY));

        let result = block_on(adapter.quote(&pair("doge", "usdt"))).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn server_error_is_a_status_error() {
        let (adapter, _) = adapter(ScriptedHttpClient::new().with_status(PRICES_URL, 503));

        let error = block_on(adapter.has_pair(&pair("btc", "usdt"))).expect_err("must fail");
        assert_eq!(error.kind(), UpstreamErrorKind::Status);
        assert_eq!(error.exchange(), ExchangeId::Poloniex);
    }
}
