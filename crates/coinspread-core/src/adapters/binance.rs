use std::sync::Arc;

use serde::Deserialize;

use super::{first_usable_price, lenient_price, Transport};
use crate::config::ClientConfig;
use crate::exchange::{AdapterFuture, ExchangeAdapter, PairListing};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

const EXCHANGE_INFO_PATH: &str = "/exchangeInfo";
const TICKER_PRICE_PATH: &str = "/ticker/price";

/// Binance spot adapter (`BTCUSDT` symbols, `TRADING` status filter).
#[derive(Clone)]
pub struct BinanceAdapter {
    transport: Transport,
}

impl Default for BinanceAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), &ClientConfig::default())
    }
}

impl BinanceAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(ExchangeId::Binance, http_client, config),
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, &ClientConfig::default())
    }
}

impl ExchangeAdapter for BinanceAdapter {
    fn id(&self) -> ExchangeId {
        ExchangeId::Binance
    }

    fn symbol_separator(&self) -> &'static str {
        ""
    }

    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move {
            let info: ExchangeInfoResponse = self
                .transport
                .fetch_json(self.transport.get(EXCHANGE_INFO_PATH))
                .await?;

            Ok(info
                .symbols
                .into_iter()
                .map(|entry| PairListing {
                    symbol: entry.symbol,
                    status: entry.status,
                    price: None,
                })
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
                .fetch_first_json::<TickerPrice, _>(requests, |_| Ok(()))
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
struct ExchangeInfoResponse {
    #[serde(default)]
    symbols: Vec<ExchangeInfoSymbol>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExchangeInfoSymbol {
    symbol: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TickerPrice {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::UpstreamErrorKind;
    use crate::test_support::{block_on, ScriptedHttpClient};

    const INFO_URL: &str = "https://api.binance.com/api/v3/exchangeInfo";
    const INFO_BODY: &str = r#"{"timezone":"UTC","symbols":[
        {"symbol":"ETHBTC","status":"TRADING"},
        {"symbol":"BTCUSDT","status":"TRADING"},
        {"symbol":"LUNAUSDT","status":"BREAK"}
    ]}"#;

    fn adapter(client: ScriptedHttpClient) -> (BinanceAdapter, Arc<ScriptedHttpClient>) {
        let client = Arc::new(client);
        (BinanceAdapter::with_http_client(client.clone()), client)
    }

    fn pair(first: &str, second: &str) -> CurrencyPair {
        CurrencyPair::parse(first, second).expect("valid pair")
    }

    #[test]
    fn quote_uses_requested_ordering_first() {
        let (adapter, client) = adapter(
            ScriptedHttpClient::new()
                .with_json(INFO_URL, INFO_BODY)
                .with_json(
                    "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT",
                    r#"{"symbol":"BTCUSDT","price":"50123.40000000"}"#,
                ),
        );

        let record = block_on(adapter.quote(&pair("btc", "usdt")))
            .expect("quote should succeed")
            .expect("pair is listed");

        assert_eq!(record.exchange, ExchangeId::Binance);
        assert_eq!(record.symbol, "BTCUSDT");
        assert_eq!(record.price, 50_123.4);
        assert_eq!(client.requested_urls().len(), 2);
    }

    #[test]
    fn quote_retries_with_opposite_ordering() {
        let (adapter, client) = adapter(
            ScriptedHttpClient::new()
                .with_json(INFO_URL, INFO_BODY)
                .with_status(
                    "https://api.binance.com/api/v3/ticker/price?symbol=BTCETH",
                    400,
                )
                .with_json(
                    "https://api.binance.com/api/v3/ticker/price?symbol=ETHBTC",
                    r#"{"symbol":"ETHBTC","price":"0.05123"}"#,
                ),
        );

        let record = block_on(adapter.quote(&pair("btc", "eth")))
            .expect("quote should succeed")
            .expect("pair is listed");

        assert_eq!(record.symbol, "ETHBTC");
        assert_eq!(record.price, 0.05123);
        assert_eq!(
            client.requested_urls().last().map(String::as_str),
            Some("https://api.binance.com/api/v3/ticker/price?symbol=ETHBTC")
        );
    }

    #[test]
    fn non_trading_pairs_are_absent() {
        let (adapter, client) =
            adapter(ScriptedHttpClient::new().with_json(INFO_URL, INFO_BODY));

        let result = block_on(adapter.quote(&pair("luna", "usdt"))).expect("no error");

        assert!(result.is_none());
        assert_eq!(client.requested_urls(), vec![INFO_URL.to_owned()]);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let (adapter, _) = adapter(
            ScriptedHttpClient::new()
                .with_json(INFO_URL, INFO_BODY)
                .with_json(
                    "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT",
                    r#"{"symbol":"BTCUSDT"}"#,
                ),
        );

        let record = block_on(adapter.quote(&pair("BTC", "USDT")))
            .expect("quote should succeed")
            .expect("pair is listed");
        assert_eq!(record.price, 0.0);
    }

    #[test]
    fn both_orderings_failing_is_an_upstream_error() {
        let (adapter, _) = adapter(ScriptedHttpClient::new().with_json(INFO_URL, INFO_BODY));

        let error = block_on(adapter.quote(&pair("usdt", "btc"))).expect_err("must fail");
        assert_eq!(error.exchange(), ExchangeId::Binance);
        assert_eq!(error.kind(), UpstreamErrorKind::Status);
    }

    #[test]
    fn unparsable_catalog_is_a_parse_error() {
        let (adapter, _) = adapter(ScriptedHttpClient::new().with_json(INFO_URL, "<html>"));

        let error = block_on(adapter.list_pairs()).expect_err("must fail");
        assert_eq!(error.kind(), UpstreamErrorKind::Parse);
    }
}
