//! # Domain Models
//!
//! Currency codes, user-entered pairs, and the normalized per-exchange quote.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Currency`] | Validated, uppercased currency code |
//! | [`CurrencyPair`] | Two distinct codes in the order the user gave them |
//! | [`TradingPairRecord`] | One exchange's price for the matched symbol |

mod currency;
mod models;

pub use currency::{Currency, CurrencyPair};
pub use models::TradingPairRecord;
