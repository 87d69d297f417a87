//! Concurrent quote collection across the registry.
//!
//! Every registered adapter is dispatched on its own tokio task under a
//! per-call timeout. Results land in per-exchange slots and are merged in
//! registry order, so output is reproducible regardless of completion order.
//! Under fail-fast the first failure to arrive ends the call and the
//! remaining tasks are aborted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::DEFAULT_CALL_TIMEOUT_MS;
use crate::exchange::{ExchangeAdapter, UpstreamError};
use crate::registry::ExchangeRegistry;
use crate::{CoreError, CurrencyPair, ExchangeId, TradingPairRecord};

/// What to do when one exchange fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the failed exchange and keep the others.
    #[default]
    BestEffort,
    /// Return the first failure and cancel outstanding calls.
    FailFast,
}

impl FailurePolicy {
    pub const fn is_fail_fast(self) -> bool {
        matches!(self, Self::FailFast)
    }
}

/// Outcome of one aggregation call.
#[derive(Debug, Clone, Default)]
pub struct QuoteCollection {
    /// Quotes in registry order.
    pub records: Vec<TradingPairRecord>,
    /// Exchanges that do not list the pair.
    pub unlisted: Vec<ExchangeId>,
    /// Failures skipped under [`FailurePolicy::BestEffort`].
    pub failures: Vec<UpstreamError>,
    pub latency_ms: u64,
}

impl QuoteCollection {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed_exchanges(&self) -> Vec<ExchangeId> {
        self.failures.iter().map(UpstreamError::exchange).collect()
    }
}

type QuoteOutcome = Result<Option<TradingPairRecord>, UpstreamError>;

#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: Arc<ExchangeRegistry>,
    policy: FailurePolicy,
    call_timeout: Duration,
}

impl Aggregator {
    pub fn new(registry: Arc<ExchangeRegistry>) -> Self {
        Self {
            registry,
            policy: FailurePolicy::default(),
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound for a single adapter's `quote`, catalog lookup included.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn registry(&self) -> &ExchangeRegistry {
        &self.registry
    }

    /// Collects quotes for `pair` from every registered exchange.
    ///
    /// # Errors
    ///
    /// Never fails under [`FailurePolicy::BestEffort`]. Under
    /// [`FailurePolicy::FailFast`] the first failure to complete is returned
    /// as [`CoreError::Upstream`] and the outstanding calls are aborted.
    pub async fn collect_quotes(
        &self,
        pair: &CurrencyPair,
    ) -> Result<Vec<TradingPairRecord>, CoreError> {
        self.collect(pair).await.map(|collection| collection.records)
    }

    /// Like [`collect_quotes`](Self::collect_quotes), also reporting unlisted
    /// and failed exchanges.
    pub async fn collect(&self, pair: &CurrencyPair) -> Result<QuoteCollection, CoreError> {
        let started = Instant::now();
        let mut tasks = JoinSet::new();
        let mut slots_by_task = HashMap::new();
        let mut exchanges = Vec::with_capacity(self.registry.len());

        for (slot, (exchange, adapter)) in self.registry.iter().enumerate() {
            debug!(exchange = %exchange, pair = %pair, "dispatching quote request");
            let handle = tasks.spawn(quote_with_timeout(
                Arc::clone(adapter),
                pair.clone(),
                self.call_timeout,
            ));
            slots_by_task.insert(handle.id(), (slot, exchange));
            exchanges.push(exchange);
        }

        let mut outcomes: Vec<Option<QuoteOutcome>> =
            std::iter::repeat_with(|| None).take(exchanges.len()).collect();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (task, joined) = match joined {
                Ok((task, outcome)) => (task, Ok(outcome)),
                Err(error) => (error.id(), Err(error)),
            };
            let Some(&(slot, exchange)) = slots_by_task.get(&task) else {
                continue;
            };
            let outcome = joined.unwrap_or_else(|error| Err(join_failure(exchange, &error)));

            match outcome {
                Err(error) if self.policy.is_fail_fast() => {
                    tasks.abort_all();
                    debug!(
                        exchange = %exchange,
                        pending = tasks.len(),
                        "aborting aggregation on first failure"
                    );
                    return Err(CoreError::Upstream(error));
                }
                outcome => outcomes[slot] = Some(outcome),
            }
        }

        let mut collection = QuoteCollection::default();
        let settled = exchanges
            .into_iter()
            .zip(outcomes)
            .filter_map(|(exchange, outcome)| outcome.map(|outcome| (exchange, outcome)));

        for (exchange, outcome) in settled {
            match outcome {
                Ok(Some(record)) => collection.records.push(record),
                Ok(None) => {
                    debug!(exchange = %exchange, pair = %pair, "pair not listed");
                    collection.unlisted.push(exchange);
                }
                Err(error) => {
                    warn!(
                        exchange = %exchange,
                        code = error.code(),
                        error = %error,
                        "skipping exchange after failure"
                    );
                    collection.failures.push(error);
                }
            }
        }

        collection.latency_ms = elapsed_ms(started);
        debug!(
            pair = %pair,
            records = collection.records.len(),
            failures = collection.failures.len(),
            latency_ms = collection.latency_ms,
            "aggregation finished"
        );
        Ok(collection)
    }
}

async fn quote_with_timeout(
    adapter: Arc<dyn ExchangeAdapter>,
    pair: CurrencyPair,
    call_timeout: Duration,
) -> QuoteOutcome {
    match tokio::time::timeout(call_timeout, adapter.quote(&pair)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(UpstreamError::timeout(
            adapter.id(),
            format!("no answer within {} ms", call_timeout.as_millis()),
        )),
    }
}

fn join_failure(exchange: ExchangeId, error: &tokio::task::JoinError) -> UpstreamError {
    if error.is_panic() {
        UpstreamError::api(exchange, "adapter task panicked")
    } else {
        UpstreamError::api(exchange, format!("adapter task did not complete: {error}"))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
