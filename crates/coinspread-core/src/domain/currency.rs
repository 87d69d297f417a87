use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_CURRENCY_LEN: usize = 20;

/// Normalized currency code (e.g. `BTC`, `USDT`, `1INCH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse and normalize a currency code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_CURRENCY_LEN {
            return Err(ValidationError::CurrencyTooLong {
                len,
                max: MAX_CURRENCY_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::CurrencyInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Currency {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

/// Two currency codes as entered by the user.
///
/// Exchanges disagree on which leg is base and which is quote, so adapters
/// probe both [`joined`](CurrencyPair::joined) and
/// [`reversed`](CurrencyPair::reversed) spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub first: Currency,
    pub second: Currency,
}

impl CurrencyPair {
    pub fn new(first: Currency, second: Currency) -> Result<Self, ValidationError> {
        if first == second {
            return Err(ValidationError::IdenticalCurrencies {
                code: first.into(),
            });
        }
        Ok(Self { first, second })
    }

    pub fn parse(first: &str, second: &str) -> Result<Self, ValidationError> {
        Self::new(Currency::parse(first)?, Currency::parse(second)?)
    }

    /// `first + separator + second`, e.g. `BTCUSDT` or `BTC_USDT`.
    pub fn joined(&self, separator: &str) -> String {
        format!("{}{separator}{}", self.first, self.second)
    }

    /// `second + separator + first`.
    pub fn reversed(&self, separator: &str) -> String {
        format!("{}{separator}{}", self.second, self.first)
    }

    /// Both spellings, requested ordering first.
    pub fn orderings(&self, separator: &str) -> [String; 2] {
        [self.joined(separator), self.reversed(separator)]
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_currency() {
        let parsed = Currency::parse(" usdt ").expect("currency should parse");
        assert_eq!(parsed.as_str(), "USDT");
    }

    #[test]
    fn accepts_leading_digits() {
        let parsed = Currency::parse("1inch").expect("currency should parse");
        assert_eq!(parsed.as_str(), "1INCH");
    }

    #[test]
    fn rejects_separators_inside_code() {
        let err = Currency::parse("BTC_USDT").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::CurrencyInvalidChar { ch: '_', index: 3 }
        ));
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Currency::parse("   "), Err(ValidationError::EmptyCurrency));
    }

    #[test]
    fn pair_builds_both_orderings() {
        let pair = CurrencyPair::parse("btc", "usdt").expect("valid pair");
        assert_eq!(pair.joined(""), "BTCUSDT");
        assert_eq!(pair.reversed("_"), "USDT_BTC");
        assert_eq!(
            pair.orderings("_"),
            [String::from("BTC_USDT"), String::from("USDT_BTC")]
        );
    }

    #[test]
    fn pair_rejects_identical_legs() {
        let err = CurrencyPair::parse("eth", "ETH").expect_err("must fail");
        assert!(matches!(err, ValidationError::IdenticalCurrencies { .. }));
    }
}
