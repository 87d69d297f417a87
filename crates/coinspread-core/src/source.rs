use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Closed set of supported exchanges.
///
/// The declaration order is the registry enumeration order, which is also the
/// order in which aggregated quotes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Binance,
    Bybit,
    Jbex,
    Poloniex,
    Whitebit,
}

impl ExchangeId {
    pub const ALL: [Self; 5] = [
        Self::Binance,
        Self::Bybit,
        Self::Jbex,
        Self::Poloniex,
        Self::Whitebit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
            Self::Jbex => "jbex",
            Self::Poloniex => "poloniex",
            Self::Whitebit => "whitebit",
        }
    }

    /// Human-facing name used in tables.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
            Self::Jbex => "Jbex",
            Self::Poloniex => "Poloniex",
            Self::Whitebit => "Whitebit",
        }
    }
}

impl Display for ExchangeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "bybit" => Ok(Self::Bybit),
            "jbex" => Ok(Self::Jbex),
            "poloniex" => Ok(Self::Poloniex),
            "whitebit" => Ok(Self::Whitebit),
            other => Err(ValidationError::InvalidExchange {
                value: other.to_owned(),
            }),
        }
    }
}
