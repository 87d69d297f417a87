//! Contract tests every exchange adapter must satisfy.

#[path = "../support/http.rs"]
mod http;

use std::sync::Arc;

use coinspread_core::{
    BinanceAdapter, BybitAdapter, CurrencyPair, ExchangeAdapter, ExchangeId, HttpError,
    JbexAdapter, PoloniexAdapter, UpstreamErrorKind, WhitebitAdapter,
};

use http::FakeHttpClient;

fn pair(first: &str, second: &str) -> CurrencyPair {
    CurrencyPair::parse(first, second).expect("valid pair")
}

struct ExchangeCase {
    id: ExchangeId,
    catalog_url: &'static str,
    /// Routes that make BTC/USDT quotable.
    routes: Vec<(&'static str, &'static str)>,
    expected_symbol: &'static str,
    expected_price: f64,
}

fn exchange_cases() -> Vec<ExchangeCase> {
    vec![
        ExchangeCase {
            id: ExchangeId::Binance,
            catalog_url: "https://api.binance.com/api/v3/exchangeInfo",
            routes: vec![
                (
                    "https://api.binance.com/api/v3/exchangeInfo",
                    r#"{"symbols":[{"symbol":"BTCUSDT","status":"TRADING"}]}"#,
                ),
                (
                    "https://api.binance.com/api/v3/ticker/price?symbol=BTCUSDT",
                    r#"{"symbol":"BTCUSDT","price":"50000.10"}"#,
                ),
            ],
            expected_symbol: "BTCUSDT",
            expected_price: 50_000.1,
        },
        ExchangeCase {
            id: ExchangeId::Bybit,
            catalog_url: "https://api-testnet.bybit.com/v5/market/tickers?category=spot",
            routes: vec![
                (
                    "https://api-testnet.bybit.com/v5/market/tickers?category=spot",
                    r#"{"retCode":0,"result":{"list":[{"symbol":"BTCUSDT","lastPrice":"50010"}]}}"#,
                ),
                (
                    "https://api-testnet.bybit.com/v5/market/tickers?symbol=BTCUSDT&category=linear",
                    r#"{"retCode":0,"result":{"list":[{"symbol":"BTCUSDT","indexPrice":"50005.5","lastPrice":"50012"}]}}"#,
                ),
            ],
            expected_symbol: "BTCUSDT",
            expected_price: 50_005.5,
        },
        ExchangeCase {
            id: ExchangeId::Jbex,
            catalog_url: "https://api.jbex.com/openapi/v1/brokerInfo?status=TRADING",
            routes: vec![
                (
                    "https://api.jbex.com/openapi/v1/brokerInfo?status=TRADING",
                    r#"{"symbols":[{"symbol":"BTCUSDT","status":"TRADING"}]}"#,
                ),
                (
                    "https://api.jbex.com/openapi/quote/v1/ticker/price?symbol=BTCUSDT",
                    r#"{"symbol":"BTCUSDT","price":"49990"}"#,
                ),
            ],
            expected_symbol: "BTCUSDT",
            expected_price: 49_990.0,
        },
        ExchangeCase {
            id: ExchangeId::Poloniex,
            catalog_url: "https://api.poloniex.com/markets/price",
            routes: vec![(
                "https://api.poloniex.com/markets/price",
                r#"[{"symbol":"BTC_USDT","price":"50020.00"}]"#,
            )],
            expected_symbol: "BTC_USDT",
            expected_price: 50_020.0,
        },
        ExchangeCase {
            id: ExchangeId::Whitebit,
            catalog_url: "https://whitebit.com/api/v4/public/markets",
            routes: vec![
                (
                    "https://whitebit.com/api/v4/public/markets",
                    r#"[{"name":"BTC_USDT"}]"#,
                ),
                (
                    "https://whitebit.com/api/v4/public/ticker",
                    r#"{"BTC_USDT":{"last_price":"50030.25"}}"#,
                ),
            ],
            expected_symbol: "BTC_USDT",
            expected_price: 50_030.25,
        },
    ]
}

fn adapter_for(id: ExchangeId, client: Arc<FakeHttpClient>) -> Arc<dyn ExchangeAdapter> {
    match id {
        ExchangeId::Binance => Arc::new(BinanceAdapter::with_http_client(client)),
        ExchangeId::Bybit => Arc::new(BybitAdapter::with_http_client(client)),
        ExchangeId::Jbex => Arc::new(JbexAdapter::with_http_client(client)),
        ExchangeId::Poloniex => Arc::new(PoloniexAdapter::with_http_client(client)),
        ExchangeId::Whitebit => Arc::new(WhitebitAdapter::with_http_client(client)),
    }
}

fn client_with(routes: &[(&str, &str)]) -> FakeHttpClient {
    routes
        .iter()
        .fold(FakeHttpClient::new(), |client, (url, body)| client.json(url, body))
}

#[tokio::test]
async fn listed_pair_yields_record_with_native_symbol() {
    for case in exchange_cases() {
        // Given: An exchange that lists BTC/USDT
        let adapter = adapter_for(case.id, Arc::new(client_with(&case.routes)));

        // When: The pair is quoted
        let record = adapter
            .quote(&pair("btc", "usdt"))
            .await
            .unwrap_or_else(|error| panic!("exchange '{}' quote failed: {error}", case.id))
            .unwrap_or_else(|| panic!("exchange '{}' should list BTC/USDT", case.id));

        // Then: The record carries the exchange's own spelling and price
        assert_eq!(record.exchange, case.id, "exchange '{}': id", case.id);
        assert_eq!(record.symbol, case.expected_symbol, "exchange '{}': symbol", case.id);
        assert_eq!(record.price, case.expected_price, "exchange '{}': price", case.id);
        assert_eq!(adapter.name(), case.id.display_name());
    }
}

#[tokio::test]
async fn has_pair_accepts_either_ordering_in_any_case() {
    for case in exchange_cases() {
        // Given: An exchange that lists BTC/USDT
        let adapter = adapter_for(case.id, Arc::new(client_with(&case.routes)));

        // When / Then: Both orderings and lowercase input match
        for (first, second) in [("btc", "usdt"), ("USDT", "btc")] {
            let listed = adapter
                .has_pair(&pair(first, second))
                .await
                .unwrap_or_else(|error| panic!("exchange '{}' has_pair failed: {error}", case.id));
            assert!(listed, "exchange '{}': {first}/{second} should be listed", case.id);
        }
    }
}

#[tokio::test]
async fn unlisted_pair_is_absent_not_an_error() {
    for case in exchange_cases() {
        // Given: An exchange that does not list DOGE/EUR
        let adapter = adapter_for(case.id, Arc::new(client_with(&case.routes)));

        // When: DOGE/EUR is quoted
        let result = adapter
            .quote(&pair("doge", "eur"))
            .await
            .unwrap_or_else(|error| panic!("exchange '{}' quote failed: {error}", case.id));

        // Then: The adapter reports absence
        assert!(result.is_none(), "exchange '{}': expected absent", case.id);
    }
}

#[tokio::test]
async fn catalog_transport_failure_is_upstream_error() {
    for case in exchange_cases() {
        // Given: The catalog endpoint is unreachable
        let client = FakeHttpClient::new().error(case.catalog_url, HttpError::new("connection refused"));
        let adapter = adapter_for(case.id, Arc::new(client));

        // When: The catalog is listed
        let error = adapter
            .list_pairs()
            .await
            .err()
            .unwrap_or_else(|| panic!("exchange '{}' should fail", case.id));

        // Then: The failure is attributed to that exchange
        assert_eq!(error.exchange(), case.id);
        assert_eq!(error.kind(), UpstreamErrorKind::Transport);
    }
}

#[tokio::test]
async fn request_timeout_is_classified_as_timeout() {
    // Given: Binance's catalog request times out
    let client = FakeHttpClient::new().error(
        "https://api.binance.com/api/v3/exchangeInfo",
        HttpError::timeout("request timeout"),
    );
    let adapter = BinanceAdapter::with_http_client(Arc::new(client));

    // When: A quote is requested
    let error = adapter
        .quote(&pair("btc", "usdt"))
        .await
        .expect_err("timeout should fail");

    // Then: The error kind is Timeout
    assert_eq!(error.kind(), UpstreamErrorKind::Timeout);
    assert_eq!(error.code(), "upstream.timeout");
}
