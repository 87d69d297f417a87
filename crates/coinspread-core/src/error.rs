use thiserror::Error;

use crate::exchange::UpstreamError;
use crate::source::ExchangeId;

/// Validation and contract errors exposed by `coinspread-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("currency code cannot be empty")]
    EmptyCurrency,
    #[error("currency code length {len} exceeds max {max}")]
    CurrencyTooLong { len: usize, max: usize },
    #[error("currency code contains invalid character '{ch}' at index {index}")]
    CurrencyInvalidChar { ch: char, index: usize },
    #[error("trading pair legs must differ: '{code}'/'{code}'")]
    IdenticalCurrencies { code: String },

    #[error("invalid exchange '{value}', expected one of binance, bybit, jbex, poloniex, whitebit")]
    InvalidExchange { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("exchange '{exchange}' is not registered")]
    UnknownExchange { exchange: ExchangeId },

    #[error("no trading pairs found")]
    NoData,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
