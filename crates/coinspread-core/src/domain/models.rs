use serde::{Deserialize, Serialize};

use crate::{ExchangeId, ValidationError};

/// Normalized price observation from one exchange.
///
/// `symbol` is the exchange-native spelling that matched (`BTCUSDT`,
/// `BTC_USDT`, ...) and is kept verbatim. A `price` of `0.0` means the pair is
/// listed but the exchange reported no usable price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingPairRecord {
    pub exchange: ExchangeId,
    pub symbol: String,
    pub price: f64,
}

impl TradingPairRecord {
    pub fn new(
        exchange: ExchangeId,
        symbol: impl Into<String>,
        price: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        Ok(Self {
            exchange,
            symbol: symbol.into(),
            price,
        })
    }

    /// Whether the record carries a real quote rather than the `0.0` sentinel.
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
