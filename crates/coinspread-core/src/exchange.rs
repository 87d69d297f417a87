//! Exchange adapter contract.
//!
//! Every supported exchange implements [`ExchangeAdapter`]. The contract hides
//! symbol spelling (`BTCUSDT` vs `BTC_USDT`), listing status filters and
//! response shapes, so the aggregator only ever sees
//! [`TradingPairRecord`]s, "not listed" (`Ok(None)`) or an [`UpstreamError`].
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`id`](ExchangeAdapter::id) | Closed exchange identifier |
//! | [`list_pairs`](ExchangeAdapter::list_pairs) | Full symbol/ticker catalog |
//! | [`has_pair`](ExchangeAdapter::has_pair) | Pair listed in either ordering |
//! | [`quote`](ExchangeAdapter::quote) | Current price for the pair |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::HttpError;
use crate::{CurrencyPair, ExchangeId, TradingPairRecord};

/// Boxed future returned by adapter operations.
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UpstreamError>> + Send + 'a>>;

/// Classification of a failed exchange call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The request never produced a response.
    Transport,
    /// The exchange answered with a non-2xx status.
    Status,
    /// The body could not be decoded into the expected shape.
    Parse,
    /// The exchange reported an application-level error in a 2xx body.
    Api,
    /// The call exceeded the caller's time budget.
    Timeout,
}

/// Network or parse failure talking to one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    exchange: ExchangeId,
    kind: UpstreamErrorKind,
    message: String,
}

impl UpstreamError {
    pub fn new(exchange: ExchangeId, kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            exchange,
            kind,
            message: message.into(),
        }
    }

    pub fn transport(exchange: ExchangeId, message: impl Into<String>) -> Self {
        Self::new(exchange, UpstreamErrorKind::Transport, message)
    }

    pub fn status(exchange: ExchangeId, status: u16, url: &str) -> Self {
        Self::new(
            exchange,
            UpstreamErrorKind::Status,
            format!("{url} returned status {status}"),
        )
    }

    pub fn parse(exchange: ExchangeId, message: impl Into<String>) -> Self {
        Self::new(exchange, UpstreamErrorKind::Parse, message)
    }

    pub fn api(exchange: ExchangeId, message: impl Into<String>) -> Self {
        Self::new(exchange, UpstreamErrorKind::Api, message)
    }

    pub fn timeout(exchange: ExchangeId, message: impl Into<String>) -> Self {
        Self::new(exchange, UpstreamErrorKind::Timeout, message)
    }

    pub fn from_http(exchange: ExchangeId, error: &HttpError) -> Self {
        if error.timed_out() {
            Self::timeout(exchange, error.message())
        } else {
            Self::transport(exchange, error.message())
        }
    }

    pub const fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    pub const fn kind(&self) -> UpstreamErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            UpstreamErrorKind::Transport => "upstream.transport",
            UpstreamErrorKind::Status => "upstream.status",
            UpstreamErrorKind::Parse => "upstream.parse",
            UpstreamErrorKind::Api => "upstream.api",
            UpstreamErrorKind::Timeout => "upstream.timeout",
        }
    }
}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.exchange, self.message, self.code())
    }
}

impl std::error::Error for UpstreamError {}

/// One raw entry of an exchange catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PairListing {
    /// Exchange-native symbol, verbatim.
    pub symbol: String,
    /// Listing status where the exchange reports one (`TRADING`, `BREAK`, ...).
    pub status: Option<String>,
    /// Price embedded in the catalog entry, for catalogs that double as tickers.
    pub price: Option<f64>,
}

impl PairListing {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            status: None,
            price: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    /// Listings without a status are treated as tradable.
    pub fn is_tradable(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case("TRADING"))
    }
}

/// Finds the tradable listing for `pair`, preferring the requested ordering.
pub fn find_listing<'a>(
    listings: &'a [PairListing],
    pair: &CurrencyPair,
    separator: &str,
) -> Option<&'a PairListing> {
    pair.orderings(separator).into_iter().find_map(|candidate| {
        listings.iter().find(|listing| {
            listing.is_tradable() && listing.symbol.eq_ignore_ascii_case(&candidate)
        })
    })
}

/// Exchange adapter contract.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the aggregator dispatches every
/// adapter on its own task.
pub trait ExchangeAdapter: Send + Sync {
    /// Returns the exchange identifier.
    fn id(&self) -> ExchangeId;

    /// Static display name.
    fn name(&self) -> &'static str {
        self.id().display_name()
    }

    /// Separator between the two legs of a symbol (`""` or `"_"`).
    fn symbol_separator(&self) -> &'static str;

    /// Fetches the exchange's full symbol/ticker catalog.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails or the body cannot be
    /// parsed.
    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>>;

    /// Returns whether the exchange lists `first+second` or `second+first`.
    ///
    /// Matching is case-insensitive and ignores listings whose status is not
    /// `TRADING`.
    fn has_pair<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, bool> {
        Box::pin(async move {
            let listings = self.list_pairs().await?;
            Ok(find_listing(&listings, pair, self.symbol_separator()).is_some())
        })
    }

    /// Fetches the current price for `pair`.
    ///
    /// Returns `Ok(None)` when the exchange does not list the pair.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the pair is listed but no ordering of
    /// the price request succeeds.
    fn quote<'a>(&'a self, pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>>;
}
