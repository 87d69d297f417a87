//! Scripted exchanges for aggregation scenarios.

use std::sync::Arc;
use std::time::Duration;

use coinspread_core::exchange::AdapterFuture;
use coinspread_core::{
    CurrencyPair, ExchangeAdapter, ExchangeId, PairListing, TradingPairRecord, UpstreamError,
};

/// Fixed outcome of a scripted exchange.
pub enum Scripted {
    Quote(&'static str, f64),
    Unlisted,
    Fails,
    Slow(Duration, &'static str, f64),
}

struct ScriptedExchange {
    id: ExchangeId,
    outcome: Scripted,
}

pub fn exchange(id: ExchangeId, outcome: Scripted) -> Arc<dyn ExchangeAdapter> {
    Arc::new(ScriptedExchange { id, outcome })
}

impl ExchangeAdapter for ScriptedExchange {
    fn id(&self) -> ExchangeId {
        self.id
    }

    fn symbol_separator(&self) -> &'static str {
        ""
    }

    fn list_pairs<'a>(&'a self) -> AdapterFuture<'a, Vec<PairListing>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn quote<'a>(&'a self, _pair: &'a CurrencyPair) -> AdapterFuture<'a, Option<TradingPairRecord>> {
        Box::pin(async move {
            match &self.outcome {
                Scripted::Quote(symbol, price) => Ok(Some(record(self.id, symbol, *price))),
                Scripted::Unlisted => Ok(None),
                Scripted::Fails => Err(UpstreamError::status(
                    self.id,
                    502,
                    "https://exchange.test/ticker",
                )),
                Scripted::Slow(delay, symbol, price) => {
                    tokio::time::sleep(*delay).await;
                    Ok(Some(record(self.id, symbol, *price)))
                }
            }
        })
    }
}

fn record(exchange: ExchangeId, symbol: &str, price: f64) -> TradingPairRecord {
    TradingPairRecord::new(exchange, symbol, price).expect("valid record")
}
